//! OBD console core: pure pipeline state machine and view-model helpers.
mod campaign;
mod effect;
mod events;
mod failure;
mod msg;
mod review;
mod state;
mod types;
mod update;
mod view_model;

pub use campaign::CampaignPhase;
pub use effect::{Effect, RemoteCall};
pub use events::{EventLog, LoggedEvent, PipelineEvent, EVENT_LOG_CAPACITY};
pub use failure::{Failure, RemoteService, ValidationError};
pub use msg::Msg;
pub use review::{copy_all_text, export_payload, removal_fraction, ReviewState, EXPORT_HEADER};
pub use state::{AppState, IntakeState, Notice, NoticeLevel, Pending, Route};
pub use types::{
    AuthToken, CampaignSchedule, ChunkSize, Credentials, DbStats, Filter, FilterCounts,
    HealthReport, HistoryEntry, LaunchRequest, NumberList, ReferenceCount, ScheduleField,
    ScrubOptions, ScrubOutcome, ScrubStage,
};
pub use update::update;
pub use view_model::{AppViewModel, FilterRowView, PREVIEW_ROWS};
