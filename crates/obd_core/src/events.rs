use std::collections::VecDeque;

use crate::RemoteService;

/// Number of entries retained by [`EventLog`].
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Committed pipeline transitions, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    SignedIn,
    SignedOut,
    UploadStarted { file: String },
    UploadCommitted { total: u64 },
    ScrubStarted { input: u64 },
    ScrubCommitted { total_input: u64, final_count: u64 },
    SideChannelWarning { detail: String },
    Exported { rows: usize },
    HistoryAppended,
    HistoryLoaded { entries: usize },
    ScheduleSubmitted { project_name: String },
    ScheduleAccepted { project_name: String },
    CampaignLaunched { project_name: String },
    StepFailed { service: Option<RemoteService>, message: String },
    SessionDiscarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    pub seq: u64,
    pub event: PipelineEvent,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventLog {
    next_seq: u64,
    entries: VecDeque<LoggedEvent>,
}

impl EventLog {
    pub(crate) fn record(&mut self, event: PipelineEvent) {
        self.next_seq += 1;
        if self.entries.len() == EVENT_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(LoggedEvent {
            seq: self.next_seq,
            event,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&PipelineEvent> {
        self.entries.back().map(|logged| &logged.event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
