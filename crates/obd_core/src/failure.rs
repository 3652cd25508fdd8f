use std::fmt;

use thiserror::Error;

use crate::ScheduleField;

/// Remote dependency being contacted when a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteService {
    Auth,
    Intake,
    Scrub,
    ReferenceStats,
    Health,
    History,
    Schedule,
    Launch,
}

impl fmt::Display for RemoteService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoteService::Auth => "authentication service",
            RemoteService::Intake => "upload service",
            RemoteService::Scrub => "scrub service",
            RemoteService::ReferenceStats => "reference stats service",
            RemoteService::Health => "health check service",
            RemoteService::History => "history service",
            RemoteService::Schedule => "scheduling service",
            RemoteService::Launch => "campaign launch service",
        };
        f.write_str(name)
    }
}

/// Local checks that fail before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("the cleaned list is empty; run the scrub pipeline first")]
    EmptyCleanedList,
    #[error("chunk size must be a positive whole number, got {0:?}")]
    InvalidChunkSize(String),
    #[error("{0} is required to launch a campaign")]
    MissingScheduleField(ScheduleField),
    #[error("username and password are required")]
    MissingCredentials,
    #[error("sign in first")]
    NotSignedIn,
}

/// Every failure a pipeline step can report to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("the {service} rejected the payload as too large; split the file into smaller batches")]
    OversizedPayload { service: RemoteService },
    #[error("the {service} rejected the request: {detail}")]
    ServiceRejected {
        service: RemoteService,
        status: u16,
        detail: String,
    },
    #[error("could not reach the {service}: {reason}")]
    Unreachable {
        service: RemoteService,
        reason: String,
    },
    #[error("the {service} sent an unusable response: {detail}")]
    MalformedResponse {
        service: RemoteService,
        detail: String,
    },
    #[error("could not read {path}: {reason}")]
    FileUnreadable { path: String, reason: String },
}

impl Failure {
    pub fn service(&self) -> Option<RemoteService> {
        match self {
            Failure::OversizedPayload { service }
            | Failure::ServiceRejected { service, .. }
            | Failure::Unreachable { service, .. }
            | Failure::MalformedResponse { service, .. } => Some(*service),
            Failure::Validation(_) => None,
            Failure::FileUnreadable { .. } => Some(RemoteService::Intake),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Failure::Validation(_))
    }
}
