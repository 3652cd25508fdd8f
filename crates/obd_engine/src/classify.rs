use obd_core::{Failure, RemoteService};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Reads a response body, mapping non-success statuses onto the failure taxonomy.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: RemoteService,
    response: reqwest::Response,
) -> Result<T, Failure> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|err| transport_failure(service, err))?;

    if !status.is_success() {
        return Err(status_failure(service, status, &body));
    }

    serde_json::from_slice(&body).map_err(|err| Failure::MalformedResponse {
        service,
        detail: err.to_string(),
    })
}

/// Like [`read_json`] for endpoints whose success body carries nothing we need.
pub(crate) async fn expect_success(
    service: RemoteService,
    response: reqwest::Response,
) -> Result<(), Failure> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response
        .bytes()
        .await
        .map_err(|err| transport_failure(service, err))?;
    Err(status_failure(service, status, &body))
}

pub(crate) fn status_failure(service: RemoteService, status: StatusCode, body: &[u8]) -> Failure {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        return Failure::OversizedPayload { service };
    }
    let detail = extract_detail(body).unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    Failure::ServiceRejected {
        service,
        status: status.as_u16(),
        detail,
    }
}

/// Pulls a human-readable reason out of an error body such as `{"detail": "..."}`.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| match value.get(key)? {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        })
}

pub(crate) fn transport_failure(service: RemoteService, err: reqwest::Error) -> Failure {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed ({err})")
    } else {
        err.to_string()
    };
    Failure::Unreachable { service, reason }
}
