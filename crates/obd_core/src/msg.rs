use std::path::PathBuf;

use crate::{
    AuthToken, CampaignSchedule, DbStats, Failure, Filter, HealthReport, HistoryEntry,
    NumberList, ScrubOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator submitted the login form.
    LoginSubmitted { username: String, password: String },
    LoginSucceeded { token: AuthToken },
    LoginFailed(Failure),
    LogoutClicked,
    /// Operator picked a file (drag-drop or browse).
    FileChosen { path: PathBuf },
    UploadSucceeded { total: u64, msisdns: NumberList },
    UploadFailed(Failure),
    FilterToggled { filter: Filter, enabled: bool },
    /// Carrier kept by the operator filter; blank clears it.
    TargetOperatorChanged(String),
    /// Re-run the scrub against the current list.
    RunScrubClicked,
    /// `generation` is the intake the scrub was issued against.
    ScrubSucceeded {
        generation: u64,
        outcome: ScrubOutcome,
        /// Non-fatal failure reported alongside a successful scrub.
        side_channel_warning: Option<String>,
    },
    ScrubFailed { generation: u64, failure: Failure },
    ExportClicked,
    ExportSaved { location: String },
    ExportFailed { reason: String },
    CopyAllClicked,
    LogEntryClicked,
    LogEntrySucceeded { message: String },
    LogEntryFailed(Failure),
    HistoryRequested,
    HistoryLoaded(Vec<HistoryEntry>),
    HistoryFailed(Failure),
    DbStatsRequested,
    DbStatsLoaded(DbStats),
    DbStatsFailed(Failure),
    HealthCheckRequested,
    HealthCheckLoaded(HealthReport),
    HealthCheckFailed(Failure),
    /// Operator confirmed the schedule form.
    LaunchClicked {
        schedule: CampaignSchedule,
        chunk_size_input: String,
    },
    ScheduleAccepted,
    ScheduleRejected(Failure),
    LaunchSucceeded { message: String },
    LaunchFailed(Failure),
    /// Operator closed the schedule form.
    ScheduleDismissed,
    /// Operator left the pipeline view; session-scoped data is discarded.
    NavigatedAway,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
