use std::time::Duration;

use obd_core::{
    AuthToken, CampaignSchedule, Credentials, DbStats, Failure, FilterCounts, HealthReport,
    HistoryEntry, LaunchRequest, RemoteService, ScrubOptions, ScrubOutcome,
};
use obd_logging::{obd_debug, obd_info, obd_trace};
use reqwest::multipart::{Form, Part};
use url::Url;

use crate::classify::{expect_success, read_json, transport_failure};
use crate::wire::{
    DbStatsResponse, FilterFlags, HealthResponse, HistoryResponse, LaunchRequestWire,
    LogEntryRequest, LoginRequest, LoginResponse, MessageResponse, ScheduleRequest, ScrubReport,
    ScrubRequest, ScrubResponse, UploadResponse, UploadedList,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Whole-request limit; `None` waits for the service indefinitely.
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl ClientSettings {
    /// Settings for a backend rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(base_url)?;
        // `Url::join` replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            ..Self::default()
        })
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            user_agent: concat!("obd_console/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Remote endpoints the dashboard drives. One method per call.
#[async_trait::async_trait]
pub trait ObdService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, Failure>;

    async fn upload(
        &self,
        token: &AuthToken,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadedList, Failure>;

    async fn scrub(
        &self,
        token: &AuthToken,
        numbers: &[String],
        options: &ScrubOptions,
    ) -> Result<ScrubReport, Failure>;

    async fn db_stats(&self, token: &AuthToken) -> Result<DbStats, Failure>;

    async fn health_check(&self, token: &AuthToken) -> Result<HealthReport, Failure>;

    /// Appends a history record; returns the service's confirmation message.
    async fn append_history(
        &self,
        token: &AuthToken,
        outcome: &ScrubOutcome,
        stats: &FilterCounts,
    ) -> Result<String, Failure>;

    async fn fetch_history(&self, token: &AuthToken) -> Result<Vec<HistoryEntry>, Failure>;

    async fn submit_schedule(
        &self,
        token: &AuthToken,
        schedule: &CampaignSchedule,
    ) -> Result<(), Failure>;

    /// Launches the campaign; returns the service's confirmation message.
    async fn launch_campaign(
        &self,
        token: &AuthToken,
        request: &LaunchRequest,
    ) -> Result<String, Failure>;
}

#[derive(Debug, Clone)]
pub struct ReqwestObdService {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestObdService {
    pub fn new(settings: ClientSettings) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone());
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self, service: RemoteService, path: &str) -> Result<Url, Failure> {
        let url = self
            .settings
            .base_url
            .join(path)
            .map_err(|err| Failure::Unreachable {
                service,
                reason: format!("invalid endpoint {path}: {err}"),
            })?;
        obd_trace!("Calling the {} at {}", service, url);
        Ok(url)
    }

    async fn send(
        &self,
        service: RemoteService,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, Failure> {
        request
            .send()
            .await
            .map_err(|err| transport_failure(service, err))
    }
}

#[async_trait::async_trait]
impl ObdService for ReqwestObdService {
    async fn login(&self, credentials: &Credentials) -> Result<AuthToken, Failure> {
        let service = RemoteService::Auth;
        let url = self.endpoint(service, "login")?;
        let body = LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        };
        let response = self.send(service, self.client.post(url).json(&body)).await?;
        let parsed: LoginResponse = read_json(service, response).await?;
        parsed
            .token
            .and_then(AuthToken::new)
            .ok_or_else(|| Failure::MalformedResponse {
                service,
                detail: "login response carried no token".to_string(),
            })
    }

    async fn upload(
        &self,
        token: &AuthToken,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<UploadedList, Failure> {
        let service = RemoteService::Intake;
        let url = self.endpoint(service, "upload")?;
        obd_info!("Uploading {} ({} bytes)", file_name, contents.len());
        let part = Part::bytes(contents).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let request = self
            .client
            .post(url)
            .bearer_auth(token.expose())
            .multipart(form);
        let response = self.send(service, request).await?;
        let parsed: UploadResponse = read_json(service, response).await?;
        Ok(parsed.into())
    }

    async fn scrub(
        &self,
        token: &AuthToken,
        numbers: &[String],
        options: &ScrubOptions,
    ) -> Result<ScrubReport, Failure> {
        let service = RemoteService::Scrub;
        let url = self.endpoint(service, "scrub")?;
        let body = ScrubRequest {
            msisdn_list: numbers,
            options: FilterFlags::from(options),
            operator: options.target_operator.as_deref(),
        };
        obd_debug!("Scrubbing {} numbers with {:?}", numbers.len(), options);
        let request = self.client.post(url).bearer_auth(token.expose()).json(&body);
        let response = self.send(service, request).await?;
        let parsed: ScrubResponse = read_json(service, response).await?;
        parsed.reconcile(numbers.len() as u64)
    }

    async fn db_stats(&self, token: &AuthToken) -> Result<DbStats, Failure> {
        let service = RemoteService::ReferenceStats;
        let url = self.endpoint(service, "db-stats")?;
        let request = self.client.get(url).bearer_auth(token.expose());
        let response = self.send(service, request).await?;
        let parsed: DbStatsResponse = read_json(service, response).await?;
        Ok(parsed.into())
    }

    async fn health_check(&self, token: &AuthToken) -> Result<HealthReport, Failure> {
        let service = RemoteService::Health;
        let url = self.endpoint(service, "health-check")?;
        let request = self.client.get(url).bearer_auth(token.expose());
        let response = self.send(service, request).await?;
        let parsed: HealthResponse = read_json(service, response).await?;
        Ok(parsed.into())
    }

    async fn append_history(
        &self,
        token: &AuthToken,
        outcome: &ScrubOutcome,
        stats: &FilterCounts,
    ) -> Result<String, Failure> {
        let service = RemoteService::History;
        let url = self.endpoint(service, "log-scrub")?;
        let body = LogEntryRequest::new(outcome, stats);
        let request = self.client.post(url).bearer_auth(token.expose()).json(&body);
        let response = self.send(service, request).await?;
        let parsed: MessageResponse = read_json(service, response).await?;
        Ok(parsed.into_message("Scrub entry logged."))
    }

    async fn fetch_history(&self, token: &AuthToken) -> Result<Vec<HistoryEntry>, Failure> {
        let service = RemoteService::History;
        let url = self.endpoint(service, "scrub-history")?;
        let request = self.client.get(url).bearer_auth(token.expose());
        let response = self.send(service, request).await?;
        let parsed: HistoryResponse = read_json(service, response).await?;
        Ok(parsed.data.into_iter().map(HistoryEntry::from).collect())
    }

    async fn submit_schedule(
        &self,
        token: &AuthToken,
        schedule: &CampaignSchedule,
    ) -> Result<(), Failure> {
        let service = RemoteService::Schedule;
        let url = self.endpoint(service, "schedule-promotion")?;
        let body = ScheduleRequest::from(schedule);
        let request = self.client.post(url).bearer_auth(token.expose()).json(&body);
        let response = self.send(service, request).await?;
        expect_success(service, response).await
    }

    async fn launch_campaign(
        &self,
        token: &AuthToken,
        request: &LaunchRequest,
    ) -> Result<String, Failure> {
        let service = RemoteService::Launch;
        let url = self.endpoint(service, "launch-campaign")?;
        let body = LaunchRequestWire {
            msisdn_list: &request.number_list,
            chunk_size: request.chunk_size.map(|chunk| chunk.get()),
        };
        let http = self.client.post(url).bearer_auth(token.expose()).json(&body);
        let response = self.send(service, http).await?;
        let parsed: MessageResponse = read_json(service, response).await?;
        Ok(parsed.into_message("Campaign launched."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let settings = ClientSettings::new("http://obd.example.com/api").unwrap();
        assert_eq!(
            settings.base_url.join("scrub").unwrap().as_str(),
            "http://obd.example.com/api/scrub"
        );
    }

    #[test]
    fn default_has_no_request_timeout() {
        let settings = ClientSettings::default();
        assert_eq!(settings.request_timeout, None);
        assert_eq!(settings.base_url.as_str(), DEFAULT_BASE_URL);
    }
}
