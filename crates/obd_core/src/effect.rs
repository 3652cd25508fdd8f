use std::path::PathBuf;

use crate::{
    AuthToken, CampaignSchedule, Credentials, FilterCounts, LaunchRequest, NumberList,
    ScrubOptions, ScrubOutcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Exchange credentials for a token. The only remote call made without one.
    SignIn { credentials: Credentials },
    /// Token-gated remote call.
    Remote { token: AuthToken, call: RemoteCall },
    /// Offer the export payload as a downloadable artifact.
    SaveExport { payload: String, rows: usize },
    CopyToClipboard { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Upload {
        path: PathBuf,
    },
    Scrub {
        numbers: NumberList,
        options: ScrubOptions,
        /// Intake generation echoed back in the completion.
        generation: u64,
    },
    FetchDbStats,
    HealthCheck,
    AppendHistory {
        outcome: ScrubOutcome,
        stats: FilterCounts,
    },
    FetchHistory,
    SubmitSchedule {
        schedule: CampaignSchedule,
    },
    LaunchCampaign {
        request: LaunchRequest,
    },
}

impl Effect {
    pub fn remote_call(&self) -> Option<&RemoteCall> {
        match self {
            Effect::Remote { call, .. } => Some(call),
            _ => None,
        }
    }
}
