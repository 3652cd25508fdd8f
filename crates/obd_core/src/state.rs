use crate::view_model::{AppViewModel, FilterRowView, PREVIEW_ROWS};
use crate::{
    AuthToken, CampaignPhase, DbStats, EventLog, Filter, HealthReport, HistoryEntry, NumberList,
    PipelineEvent, ReviewState, ScrubOptions,
};

/// Which view the session gate allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    SignIn,
    Pipeline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible message produced by a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Requests currently awaiting a completion message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pending {
    pub login: bool,
    pub upload: bool,
    pub scrub: bool,
    pub log_entry: bool,
    pub history: bool,
    pub db_stats: bool,
    pub health: bool,
}

/// Numbers produced by the last successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntakeState {
    pub total: u64,
    pub numbers: NumberList,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    token: Option<AuthToken>,
    options: ScrubOptions,
    intake: IntakeState,
    intake_generation: u64,
    review: ReviewState,
    campaign: CampaignPhase,
    history: Vec<HistoryEntry>,
    db_stats: Option<DbStats>,
    health: Option<HealthReport>,
    pending: Pending,
    notices: Vec<Notice>,
    events: EventLog,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self) -> Route {
        if self.token.is_some() {
            Route::Pipeline
        } else {
            Route::SignIn
        }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn options(&self) -> &ScrubOptions {
        &self.options
    }

    pub fn intake(&self) -> &IntakeState {
        &self.intake
    }

    /// Bumped whenever the intake list is replaced or discarded.
    pub fn intake_generation(&self) -> u64 {
        self.intake_generation
    }

    pub fn review(&self) -> &ReviewState {
        &self.review
    }

    pub fn campaign(&self) -> &CampaignPhase {
        &self.campaign
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn pending(&self) -> Pending {
        self.pending
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drains queued notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Returns whether the view changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn view(&self) -> AppViewModel {
        let outcome = self.review.outcome();
        let stats = self.review.stats();
        AppViewModel {
            route: self.route(),
            total: self.intake.total,
            final_count: outcome.map(|o| o.final_count()).unwrap_or(0),
            filters: Filter::ALL
                .into_iter()
                .map(|filter| FilterRowView {
                    filter,
                    enabled: self.options.is_enabled(filter),
                    removed: stats.get(filter),
                    fraction: self.review.removal_fraction(filter),
                })
                .collect(),
            target_operator: self.options.target_operator.clone(),
            cleaned_preview: self
                .review
                .cleaned_list()
                .iter()
                .take(PREVIEW_ROWS)
                .cloned()
                .collect(),
            stages: outcome.map(|o| o.stages().to_vec()).unwrap_or_default(),
            campaign_phase: self.campaign.label(),
            busy: self.pending != Pending::default(),
            history: self.history.clone(),
            db_stats: self.db_stats.clone(),
            health: self.health.clone(),
            last_event: self.events.last().cloned(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
        self.dirty = true;
    }

    pub(crate) fn record(&mut self, event: PipelineEvent) {
        self.events.record(event);
        self.dirty = true;
    }

    pub(crate) fn sign_in(&mut self, token: AuthToken) {
        self.token = Some(token);
        self.pending.login = false;
        self.record(PipelineEvent::SignedIn);
    }

    /// Clears the token together with everything fetched under it.
    pub(crate) fn sign_out(&mut self) {
        self.token = None;
        self.discard_session();
        self.history.clear();
        self.db_stats = None;
        self.health = None;
        self.pending = Pending::default();
        self.record(PipelineEvent::SignedOut);
    }

    /// Drops session-scoped pipeline data: list, outcome, campaign attempt.
    pub(crate) fn discard_session(&mut self) {
        self.intake = IntakeState::default();
        self.intake_generation += 1;
        self.review.clear();
        self.campaign = CampaignPhase::Idle;
        self.pending.upload = false;
        self.pending.scrub = false;
        self.pending.log_entry = false;
        self.dirty = true;
    }

    pub(crate) fn options_mut(&mut self) -> &mut ScrubOptions {
        self.dirty = true;
        &mut self.options
    }

    /// Installs a fresh upload, resetting the previous outcome and stats.
    ///
    /// A scrub still in flight belongs to the replaced list and is superseded.
    pub(crate) fn install_intake(&mut self, total: u64, numbers: NumberList) {
        self.intake = IntakeState { total, numbers };
        self.intake_generation += 1;
        self.pending.scrub = false;
        self.review.clear();
        self.dirty = true;
    }

    pub(crate) fn review_mut(&mut self) -> &mut ReviewState {
        self.dirty = true;
        &mut self.review
    }

    pub(crate) fn campaign_mut(&mut self) -> &mut CampaignPhase {
        self.dirty = true;
        &mut self.campaign
    }

    pub(crate) fn pending_mut(&mut self) -> &mut Pending {
        self.dirty = true;
        &mut self.pending
    }

    pub(crate) fn set_history(&mut self, entries: Vec<HistoryEntry>) {
        self.history = entries;
        self.dirty = true;
    }

    pub(crate) fn set_db_stats(&mut self, stats: DbStats) {
        self.db_stats = Some(stats);
        self.dirty = true;
    }

    pub(crate) fn set_health(&mut self, report: HealthReport) {
        self.health = Some(report);
        self.dirty = true;
    }
}
