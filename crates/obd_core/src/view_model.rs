use crate::{DbStats, Filter, HealthReport, HistoryEntry, PipelineEvent, Route, ScrubStage};

/// Number of cleaned numbers shown in the review preview.
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub route: Route,
    pub total: u64,
    pub final_count: u64,
    pub filters: Vec<FilterRowView>,
    pub target_operator: Option<String>,
    pub cleaned_preview: Vec<String>,
    pub stages: Vec<ScrubStage>,
    pub campaign_phase: &'static str,
    pub busy: bool,
    pub history: Vec<HistoryEntry>,
    pub db_stats: Option<DbStats>,
    pub health: Option<HealthReport>,
    pub last_event: Option<PipelineEvent>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterRowView {
    pub filter: Filter,
    pub enabled: bool,
    pub removed: u64,
    /// Removed share of the scrub input; 0 when the input was empty.
    pub fraction: f64,
}

impl AppViewModel {
    pub fn removed(&self, filter: Filter) -> u64 {
        self.filters
            .iter()
            .find(|row| row.filter == filter)
            .map(|row| row.removed)
            .unwrap_or(0)
    }
}
