use std::path::Path;

use obd_core::{AuthToken, Effect, Failure, Msg, RemoteCall, RemoteService};
use obd_logging::{obd_info, obd_warn};

use crate::ObdService;

/// Runs a network effect to completion and returns the message reporting it.
///
/// Local effects (export, clipboard) are not handled here and yield `None`.
pub async fn execute(service: &dyn ObdService, effect: Effect) -> Option<Msg> {
    match effect {
        Effect::SignIn { credentials } => Some(match service.login(&credentials).await {
            Ok(token) => Msg::LoginSucceeded { token },
            Err(failure) => Msg::LoginFailed(failure),
        }),
        Effect::Remote { token, call } => Some(execute_remote(service, &token, call).await),
        Effect::SaveExport { .. } | Effect::CopyToClipboard { .. } => None,
    }
}

async fn execute_remote(service: &dyn ObdService, token: &AuthToken, call: RemoteCall) -> Msg {
    match call {
        RemoteCall::Upload { path } => match read_upload(&path).await {
            Ok((file_name, contents)) => {
                match service.upload(token, &file_name, contents).await {
                    Ok(list) => Msg::UploadSucceeded {
                        total: list.total,
                        msisdns: list.msisdns,
                    },
                    Err(failure) => failed(Msg::UploadFailed, failure),
                }
            }
            Err(failure) => failed(Msg::UploadFailed, failure),
        },
        RemoteCall::Scrub {
            numbers,
            options,
            generation,
        } => {
            match service.scrub(token, &numbers, &options).await {
                Ok(report) => {
                    obd_info!(
                        "Scrub kept {} of {} numbers",
                        report.outcome.final_count(),
                        report.outcome.total_input()
                    );
                    Msg::ScrubSucceeded {
                        generation,
                        outcome: report.outcome,
                        side_channel_warning: report.side_channel_warning,
                    }
                }
                Err(failure) => {
                    obd_warn!("Remote call failed: {}", failure);
                    Msg::ScrubFailed {
                        generation,
                        failure,
                    }
                }
            }
        }
        RemoteCall::FetchDbStats => match service.db_stats(token).await {
            Ok(stats) => Msg::DbStatsLoaded(stats),
            Err(failure) => failed(Msg::DbStatsFailed, failure),
        },
        RemoteCall::HealthCheck => match service.health_check(token).await {
            Ok(report) => Msg::HealthCheckLoaded(report),
            Err(failure) => failed(Msg::HealthCheckFailed, failure),
        },
        RemoteCall::AppendHistory { outcome, stats } => {
            match service.append_history(token, &outcome, &stats).await {
                Ok(message) => Msg::LogEntrySucceeded { message },
                Err(failure) => failed(Msg::LogEntryFailed, failure),
            }
        }
        RemoteCall::FetchHistory => match service.fetch_history(token).await {
            Ok(entries) => Msg::HistoryLoaded(entries),
            Err(failure) => failed(Msg::HistoryFailed, failure),
        },
        RemoteCall::SubmitSchedule { schedule } => {
            match service.submit_schedule(token, &schedule).await {
                Ok(()) => Msg::ScheduleAccepted,
                Err(failure) => failed(Msg::ScheduleRejected, failure),
            }
        }
        RemoteCall::LaunchCampaign { request } => {
            match service.launch_campaign(token, &request).await {
                Ok(message) => Msg::LaunchSucceeded { message },
                Err(failure) => failed(Msg::LaunchFailed, failure),
            }
        }
    }
}

/// The completion reporting that `effect` never reached its service.
///
/// Lets the controller release the pending flag of a request the engine could
/// not accept. Local effects yield `None`.
pub fn unreachable_completion(effect: Effect, reason: &str) -> Option<Msg> {
    let call = match effect {
        Effect::SignIn { .. } => {
            return Some(Msg::LoginFailed(Failure::Unreachable {
                service: RemoteService::Auth,
                reason: reason.to_string(),
            }))
        }
        Effect::Remote { call, .. } => call,
        Effect::SaveExport { .. } | Effect::CopyToClipboard { .. } => return None,
    };
    let unreachable = |service| Failure::Unreachable {
        service,
        reason: reason.to_string(),
    };
    Some(match call {
        RemoteCall::Upload { .. } => Msg::UploadFailed(unreachable(RemoteService::Intake)),
        RemoteCall::Scrub { generation, .. } => Msg::ScrubFailed {
            generation,
            failure: unreachable(RemoteService::Scrub),
        },
        RemoteCall::FetchDbStats => Msg::DbStatsFailed(unreachable(RemoteService::ReferenceStats)),
        RemoteCall::HealthCheck => Msg::HealthCheckFailed(unreachable(RemoteService::Health)),
        RemoteCall::AppendHistory { .. } => {
            Msg::LogEntryFailed(unreachable(RemoteService::History))
        }
        RemoteCall::FetchHistory => Msg::HistoryFailed(unreachable(RemoteService::History)),
        RemoteCall::SubmitSchedule { .. } => {
            Msg::ScheduleRejected(unreachable(RemoteService::Schedule))
        }
        RemoteCall::LaunchCampaign { .. } => Msg::LaunchFailed(unreachable(RemoteService::Launch)),
    })
}

fn failed(wrap: fn(Failure) -> Msg, failure: Failure) -> Msg {
    obd_warn!("Remote call failed: {}", failure);
    wrap(failure)
}

/// Reads the chosen file verbatim; parsing is left to the upload service.
async fn read_upload(path: &Path) -> Result<(String, Vec<u8>), Failure> {
    let unreadable = |reason: String| Failure::FileUnreadable {
        path: path.display().to_string(),
        reason,
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| unreadable("not a file".to_string()))?;
    let contents = tokio::fs::read(path)
        .await
        .map_err(|err| unreadable(err.to_string()))?;
    Ok((file_name, contents))
}
