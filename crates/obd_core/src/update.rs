use obd_logging::{obd_debug, obd_warn};

use crate::review::{copy_all_text, export_payload};
use crate::{
    AppState, AuthToken, CampaignPhase, CampaignSchedule, ChunkSize, Credentials, DbStats, Effect,
    Failure, LaunchRequest, Msg, NoticeLevel, PipelineEvent, RemoteCall, ValidationError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoginSubmitted { username, password } => {
            login_submitted(&mut state, username, password)
        }
        Msg::LoginSucceeded { token } => {
            if state.pending().login {
                state.sign_in(token);
                state.notify(NoticeLevel::Info, "Signed in.");
            }
            Vec::new()
        }
        Msg::LoginFailed(failure) => {
            state.pending_mut().login = false;
            report_failure(&mut state, &failure, "Sign-in failed");
            Vec::new()
        }
        Msg::LogoutClicked => {
            if state.token().is_some() {
                state.sign_out();
                state.notify(NoticeLevel::Info, "Signed out.");
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
        other => {
            let Some(token) = state.token().cloned() else {
                return (gated(state, &other), Vec::new());
            };
            pipeline(&mut state, token, other)
        }
    };

    (state, effects)
}

/// Messages that require a signed-in session.
fn pipeline(state: &mut AppState, token: AuthToken, msg: Msg) -> Vec<Effect> {
    match msg {
        Msg::FileChosen { path } => {
            if state.pending().upload {
                state.notify(NoticeLevel::Warning, "An upload is already in progress.");
                return Vec::new();
            }
            state.pending_mut().upload = true;
            state.record(PipelineEvent::UploadStarted {
                file: path.display().to_string(),
            });
            vec![Effect::Remote {
                token,
                call: RemoteCall::Upload { path },
            }]
        }
        Msg::UploadSucceeded { total, msisdns } => {
            if !state.pending().upload {
                obd_debug!("Ignoring upload result with no upload pending");
                return Vec::new();
            }
            state.pending_mut().upload = false;
            state.install_intake(total, msisdns);
            state.record(PipelineEvent::UploadCommitted { total });
            if state.intake().numbers.is_empty() {
                state.notify(NoticeLevel::Info, "The uploaded file contained no numbers.");
                return Vec::new();
            }
            // Intake success chains straight into the scrub step.
            start_scrub(state, token)
        }
        Msg::UploadFailed(failure) => {
            state.pending_mut().upload = false;
            report_failure(state, &failure, "Upload failed");
            Vec::new()
        }
        Msg::FilterToggled { filter, enabled } => {
            state.options_mut().set(filter, enabled);
            Vec::new()
        }
        Msg::TargetOperatorChanged(raw) => {
            let trimmed = raw.trim();
            state.options_mut().target_operator =
                (!trimmed.is_empty()).then(|| trimmed.to_string());
            Vec::new()
        }
        Msg::RunScrubClicked => start_scrub(state, token),
        Msg::ScrubSucceeded {
            generation,
            outcome,
            side_channel_warning,
        } => {
            if !scrub_is_current(state, generation) {
                return Vec::new();
            }
            state.pending_mut().scrub = false;
            let total_input = outcome.total_input();
            let final_count = outcome.final_count();
            state.review_mut().commit(outcome);
            state.record(PipelineEvent::ScrubCommitted {
                total_input,
                final_count,
            });
            if let Some(detail) = side_channel_warning {
                state.notify(
                    NoticeLevel::Warning,
                    format!("Scrub completed, but the report email failed: {detail}"),
                );
                state.record(PipelineEvent::SideChannelWarning { detail });
            }
            Vec::new()
        }
        Msg::ScrubFailed {
            generation,
            failure,
        } => {
            if !scrub_is_current(state, generation) {
                return Vec::new();
            }
            state.pending_mut().scrub = false;
            report_failure(state, &failure, "Scrub failed");
            Vec::new()
        }
        Msg::ExportClicked => match export_payload(state.review().cleaned_list()) {
            Some(payload) => vec![Effect::SaveExport {
                payload,
                rows: state.review().cleaned_list().len(),
            }],
            None => {
                state.notify(
                    NoticeLevel::Info,
                    "No data to download yet. Please run a scrub first.",
                );
                Vec::new()
            }
        },
        Msg::ExportSaved { location } => {
            let rows = state.review().cleaned_list().len();
            state.record(PipelineEvent::Exported { rows });
            state.notify(NoticeLevel::Info, format!("Saved {rows} numbers to {location}."));
            Vec::new()
        }
        Msg::ExportFailed { reason } => {
            state.notify(
                NoticeLevel::Error,
                format!("Download failed ({reason}). Use copy-all as a workaround."),
            );
            Vec::new()
        }
        Msg::CopyAllClicked => {
            let cleaned = state.review().cleaned_list();
            if cleaned.is_empty() {
                state.notify(NoticeLevel::Info, "No data to copy yet.");
                return Vec::new();
            }
            vec![Effect::CopyToClipboard {
                text: copy_all_text(cleaned),
            }]
        }
        Msg::LogEntryClicked => {
            let Some(outcome) = state.review().outcome().cloned() else {
                report_failure(
                    state,
                    &ValidationError::EmptyCleanedList.into(),
                    "Cannot log entry",
                );
                return Vec::new();
            };
            if state.pending().log_entry {
                return Vec::new();
            }
            state.pending_mut().log_entry = true;
            let stats = state.review().stats();
            vec![Effect::Remote {
                token,
                call: RemoteCall::AppendHistory { outcome, stats },
            }]
        }
        Msg::LogEntrySucceeded { message } => {
            if state.pending().log_entry {
                state.pending_mut().log_entry = false;
                state.record(PipelineEvent::HistoryAppended);
                state.notify(NoticeLevel::Info, message);
            }
            Vec::new()
        }
        Msg::LogEntryFailed(failure) => {
            state.pending_mut().log_entry = false;
            report_failure(state, &failure, "Could not log entry");
            Vec::new()
        }
        Msg::HistoryRequested => {
            if state.pending().history {
                return Vec::new();
            }
            state.pending_mut().history = true;
            vec![Effect::Remote {
                token,
                call: RemoteCall::FetchHistory,
            }]
        }
        Msg::HistoryLoaded(entries) => {
            state.pending_mut().history = false;
            state.record(PipelineEvent::HistoryLoaded {
                entries: entries.len(),
            });
            state.set_history(entries);
            Vec::new()
        }
        Msg::HistoryFailed(failure) => {
            state.pending_mut().history = false;
            report_failure(state, &failure, "Could not load history");
            Vec::new()
        }
        Msg::DbStatsRequested => {
            if state.pending().db_stats {
                return Vec::new();
            }
            state.pending_mut().db_stats = true;
            vec![Effect::Remote {
                token,
                call: RemoteCall::FetchDbStats,
            }]
        }
        Msg::DbStatsLoaded(stats) => {
            state.pending_mut().db_stats = false;
            state.set_db_stats(stats);
            Vec::new()
        }
        Msg::DbStatsFailed(failure) => {
            state.pending_mut().db_stats = false;
            state.set_db_stats(DbStats::default());
            state.notify(
                NoticeLevel::Warning,
                format!("Reference counts unavailable: {failure}"),
            );
            Vec::new()
        }
        Msg::HealthCheckRequested => {
            if state.pending().health {
                return Vec::new();
            }
            state.pending_mut().health = true;
            vec![Effect::Remote {
                token,
                call: RemoteCall::HealthCheck,
            }]
        }
        Msg::HealthCheckLoaded(report) => {
            state.pending_mut().health = false;
            for alert in report.alerts.iter().filter(|alert| is_alarm(alert)) {
                state.notify(NoticeLevel::Warning, alert.clone());
            }
            state.set_health(report);
            Vec::new()
        }
        Msg::HealthCheckFailed(failure) => {
            state.pending_mut().health = false;
            report_failure(state, &failure, "Health check failed");
            Vec::new()
        }
        Msg::LaunchClicked {
            schedule,
            chunk_size_input,
        } => launch_clicked(state, token, schedule, &chunk_size_input),
        Msg::ScheduleAccepted => match state.campaign_mut().schedule_accepted() {
            Some(request) => {
                let project_name = project_name(state);
                state.record(PipelineEvent::ScheduleAccepted { project_name });
                vec![Effect::Remote {
                    token,
                    call: RemoteCall::LaunchCampaign { request },
                }]
            }
            None => {
                obd_warn!("Schedule acceptance arrived outside the scheduling phase");
                Vec::new()
            }
        },
        Msg::ScheduleRejected(failure) => {
            if state.campaign_mut().schedule_rejected(failure.clone()) {
                report_failure(state, &failure, "Scheduling failed");
            }
            Vec::new()
        }
        Msg::LaunchSucceeded { message } => {
            let project_name = project_name(state);
            if state.campaign_mut().launch_succeeded(message.clone()) {
                state.record(PipelineEvent::CampaignLaunched { project_name });
                state.notify(NoticeLevel::Info, message);
            }
            Vec::new()
        }
        Msg::LaunchFailed(failure) => {
            let project_name = project_name(state);
            if state.campaign_mut().launch_failed(failure.clone()) {
                report_failure(
                    state,
                    &failure,
                    &format!("Campaign '{project_name}' was scheduled but the launch failed"),
                );
            }
            Vec::new()
        }
        Msg::ScheduleDismissed => {
            if state.campaign_mut().dismiss() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NavigatedAway => {
            state.discard_session();
            state.record(PipelineEvent::SessionDiscarded);
            Vec::new()
        }
        Msg::LoginSubmitted { .. }
        | Msg::LoginSucceeded { .. }
        | Msg::LoginFailed(_)
        | Msg::LogoutClicked
        | Msg::Tick
        | Msg::NoOp => Vec::new(),
    }
}

fn login_submitted(state: &mut AppState, username: String, password: String) -> Vec<Effect> {
    if state.token().is_some() || state.pending().login {
        return Vec::new();
    }
    let username = username.trim().to_string();
    if username.is_empty() || password.is_empty() {
        report_failure(
            state,
            &ValidationError::MissingCredentials.into(),
            "Sign-in failed",
        );
        return Vec::new();
    }
    state.pending_mut().login = true;
    vec![Effect::SignIn {
        credentials: Credentials { username, password },
    }]
}

/// Scrubs the current intake list. An empty list is a no-op.
fn start_scrub(state: &mut AppState, token: AuthToken) -> Vec<Effect> {
    let numbers = state.intake().numbers.clone();
    if numbers.is_empty() {
        return Vec::new();
    }
    if state.pending().scrub {
        state.notify(NoticeLevel::Warning, "A scrub is already in progress.");
        return Vec::new();
    }
    state.pending_mut().scrub = true;
    state.record(PipelineEvent::ScrubStarted {
        input: numbers.len() as u64,
    });
    vec![Effect::Remote {
        token,
        call: RemoteCall::Scrub {
            numbers,
            options: state.options().clone(),
            generation: state.intake_generation(),
        },
    }]
}

/// Whether a scrub completion belongs to the scrub currently awaited.
fn scrub_is_current(state: &AppState, generation: u64) -> bool {
    if !state.pending().scrub {
        obd_debug!("Ignoring scrub result with no scrub pending");
        return false;
    }
    if generation != state.intake_generation() {
        obd_debug!(
            "Ignoring scrub result for intake {} (current {})",
            generation,
            state.intake_generation()
        );
        return false;
    }
    true
}

fn launch_clicked(
    state: &mut AppState,
    token: AuthToken,
    schedule: CampaignSchedule,
    chunk_size_input: &str,
) -> Vec<Effect> {
    let cleaned = state.review().cleaned_list().to_vec();
    let validated = if cleaned.is_empty() {
        Err(ValidationError::EmptyCleanedList)
    } else {
        schedule
            .validate()
            .and_then(|()| ChunkSize::parse_input(chunk_size_input))
    };
    let chunk_size = match validated {
        Ok(chunk_size) => chunk_size,
        Err(err) => {
            report_failure(state, &err.into(), "Cannot launch campaign");
            return Vec::new();
        }
    };

    let request = LaunchRequest {
        number_list: cleaned,
        chunk_size,
    };
    if !state.campaign_mut().begin(schedule.clone(), request) {
        state.notify(
            NoticeLevel::Warning,
            "A campaign submission is already in progress.",
        );
        return Vec::new();
    }
    state.record(PipelineEvent::ScheduleSubmitted {
        project_name: schedule.project_name.clone(),
    });
    vec![Effect::Remote {
        token,
        call: RemoteCall::SubmitSchedule { schedule },
    }]
}

fn project_name(state: &AppState) -> String {
    match state.campaign() {
        CampaignPhase::Scheduling { schedule, .. }
        | CampaignPhase::ScheduleSubmitted { schedule, .. } => schedule.project_name.clone(),
        CampaignPhase::Launched { project_name, .. }
        | CampaignPhase::LaunchFailed { project_name, .. } => project_name.clone(),
        _ => String::new(),
    }
}

/// Handles a pipeline message that arrived without a session.
fn gated(mut state: AppState, msg: &Msg) -> AppState {
    let is_completion = matches!(
        msg,
        Msg::UploadSucceeded { .. }
            | Msg::UploadFailed(_)
            | Msg::ScrubSucceeded { .. }
            | Msg::ScrubFailed { .. }
            | Msg::ExportSaved { .. }
            | Msg::ExportFailed { .. }
            | Msg::LogEntrySucceeded { .. }
            | Msg::LogEntryFailed(_)
            | Msg::HistoryLoaded(_)
            | Msg::HistoryFailed(_)
            | Msg::DbStatsLoaded(_)
            | Msg::DbStatsFailed(_)
            | Msg::HealthCheckLoaded(_)
            | Msg::HealthCheckFailed(_)
            | Msg::ScheduleAccepted
            | Msg::ScheduleRejected(_)
            | Msg::LaunchSucceeded { .. }
            | Msg::LaunchFailed(_)
    );
    if is_completion {
        obd_debug!("Dropping completion that arrived after sign-out");
    } else {
        state.notify(NoticeLevel::Error, ValidationError::NotSignedIn.to_string());
    }
    state
}

fn report_failure(state: &mut AppState, failure: &Failure, context: &str) {
    obd_warn!("{context}: {failure}");
    state.notify(NoticeLevel::Error, format!("{context}: {failure}"));
    if !failure.is_validation() {
        state.record(PipelineEvent::StepFailed {
            service: failure.service(),
            message: failure.to_string(),
        });
    }
}

fn is_alarm(alert: &str) -> bool {
    let upper = alert.to_ascii_uppercase();
    upper.starts_with("CRITICAL") || upper.starts_with("WARNING") || upper.starts_with("EMERGENCY")
}
