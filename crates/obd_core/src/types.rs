use std::fmt;
use std::num::NonZeroU64;

use crate::ValidationError;

/// Ordered list of MSISDNs. Never mutated in place; each step produces a new list.
pub type NumberList = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Filter {
    Dnd,
    Sub,
    Unsub,
    Operator,
}

impl Filter {
    pub const ALL: [Filter; 4] = [Filter::Dnd, Filter::Sub, Filter::Unsub, Filter::Operator];

    /// Key used by the scrub service for this filter.
    pub fn key(self) -> &'static str {
        match self {
            Filter::Dnd => "dnd",
            Filter::Sub => "sub",
            Filter::Unsub => "unsub",
            Filter::Operator => "operator",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Filter::ALL
            .into_iter()
            .find(|filter| filter.key().eq_ignore_ascii_case(key.trim()))
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Filter toggles sent with every scrub request. All four are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOptions {
    pub dnd: bool,
    pub sub: bool,
    pub unsub: bool,
    pub operator: bool,
    /// Carrier the `operator` filter keeps; `None` lets the service decide.
    pub target_operator: Option<String>,
}

impl Default for ScrubOptions {
    fn default() -> Self {
        Self {
            dnd: true,
            sub: true,
            unsub: true,
            operator: true,
            target_operator: None,
        }
    }
}

impl ScrubOptions {
    pub fn is_enabled(&self, filter: Filter) -> bool {
        match filter {
            Filter::Dnd => self.dnd,
            Filter::Sub => self.sub,
            Filter::Unsub => self.unsub,
            Filter::Operator => self.operator,
        }
    }

    pub fn set(&mut self, filter: Filter, enabled: bool) {
        match filter {
            Filter::Dnd => self.dnd = enabled,
            Filter::Sub => self.sub = enabled,
            Filter::Unsub => self.unsub = enabled,
            Filter::Operator => self.operator = enabled,
        }
    }
}

/// Per-filter removal counts ("session stats").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCounts {
    pub dnd: u64,
    pub sub: u64,
    pub unsub: u64,
    pub operator: u64,
}

impl FilterCounts {
    pub fn get(&self, filter: Filter) -> u64 {
        match filter {
            Filter::Dnd => self.dnd,
            Filter::Sub => self.sub,
            Filter::Unsub => self.unsub,
            Filter::Operator => self.operator,
        }
    }
}

/// One row of the scrub report's stage breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubStage {
    pub stage: String,
    pub count: u64,
    pub removed: u64,
}

/// Reconciled result of a single scrub call.
///
/// Only constructible through [`ScrubOutcome::new`], which enforces
/// `final_count == final_list.len()` and `final_count <= total_input`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOutcome {
    total_input: u64,
    per_filter_removed: FilterCounts,
    final_list: NumberList,
    stages: Vec<ScrubStage>,
}

impl ScrubOutcome {
    /// Returns `None` when the surviving list is longer than the input.
    pub fn new(
        total_input: u64,
        per_filter_removed: FilterCounts,
        final_list: NumberList,
        stages: Vec<ScrubStage>,
    ) -> Option<Self> {
        if final_list.len() as u64 > total_input {
            return None;
        }
        Some(Self {
            total_input,
            per_filter_removed,
            final_list,
            stages,
        })
    }

    pub fn total_input(&self) -> u64 {
        self.total_input
    }

    pub fn final_count(&self) -> u64 {
        self.final_list.len() as u64
    }

    pub fn per_filter_removed(&self) -> FilterCounts {
        self.per_filter_removed
    }

    pub fn final_list(&self) -> &[String] {
        &self.final_list
    }

    pub fn stages(&self) -> &[ScrubStage] {
        &self.stages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    ProjectName,
    FlowName,
    MscIp,
    CliMask,
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScheduleField::ProjectName => "project name",
            ScheduleField::FlowName => "flow name",
            ScheduleField::MscIp => "MSC IP",
            ScheduleField::CliMask => "CLI mask",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CampaignSchedule {
    pub project_name: String,
    pub flow_name: String,
    pub msc_ip: String,
    pub cli_mask: String,
}

impl CampaignSchedule {
    /// Submission guard: every field must contain something other than whitespace.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            (ScheduleField::ProjectName, &self.project_name),
            (ScheduleField::FlowName, &self.flow_name),
            (ScheduleField::MscIp, &self.msc_ip),
            (ScheduleField::CliMask, &self.cli_mask),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(ValidationError::MissingScheduleField(*field)),
            None => Ok(()),
        }
    }
}

/// Positive batching hint forwarded to the launch service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize(NonZeroU64);

impl ChunkSize {
    pub fn new(value: u64) -> Option<Self> {
        NonZeroU64::new(value).map(Self)
    }

    /// Parses operator input. Blank input means "no hint".
    pub fn parse_input(input: &str) -> Result<Option<Self>, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<u64>()
            .ok()
            .and_then(ChunkSize::new)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidChunkSize(trimmed.to_string()))
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub number_list: NumberList,
    pub chunk_size: Option<ChunkSize>,
}

/// Read-only record owned by the history service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub total_input: u64,
    pub final_count: u64,
    pub per_filter_removed: FilterCounts,
    pub results_summary: String,
}

/// A reference-table size as reported by the service, which sends
/// diagnostics such as `DB_NOT_INIT` in place of a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceCount {
    Known(u64),
    Unavailable(String),
}

impl Default for ReferenceCount {
    fn default() -> Self {
        ReferenceCount::Unavailable("N/A".to_string())
    }
}

impl fmt::Display for ReferenceCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceCount::Known(count) => write!(f, "{count}"),
            ReferenceCount::Unavailable(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DbStats {
    pub dnd_count: ReferenceCount,
    pub sub_count: ReferenceCount,
    pub unsub_count: ReferenceCount,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HealthReport {
    pub status: String,
    pub database: String,
    pub connected_to: Option<String>,
    pub database_type: Option<String>,
    pub alerts: Vec<String>,
}

/// Opaque bearer token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Login form contents. `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
