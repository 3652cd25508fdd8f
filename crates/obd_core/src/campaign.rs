//! Schedule-then-launch state machine.
//!
//! The launch request only exists inside [`CampaignPhase::Scheduling`] and
//! [`CampaignPhase::ScheduleSubmitted`], so a launch can only be issued after
//! the schedule write has been accepted.

use std::mem;

use crate::{CampaignSchedule, Failure, LaunchRequest};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CampaignPhase {
    #[default]
    Idle,
    /// Schedule write in flight.
    Scheduling {
        schedule: CampaignSchedule,
        request: LaunchRequest,
    },
    /// Schedule persisted; launch in flight.
    ScheduleSubmitted {
        schedule: CampaignSchedule,
        request: LaunchRequest,
    },
    Launched {
        project_name: String,
        message: String,
    },
    ScheduleFailed {
        failure: Failure,
    },
    /// The schedule record exists remotely but no campaign is running.
    LaunchFailed {
        project_name: String,
        failure: Failure,
    },
}

impl CampaignPhase {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CampaignPhase::Scheduling { .. } | CampaignPhase::ScheduleSubmitted { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            CampaignPhase::Idle => "idle",
            CampaignPhase::Scheduling { .. } => "scheduling",
            CampaignPhase::ScheduleSubmitted { .. } => "schedule submitted",
            CampaignPhase::Launched { .. } => "launched",
            CampaignPhase::ScheduleFailed { .. } => "schedule failed",
            CampaignPhase::LaunchFailed { .. } => "launch failed",
        }
    }

    /// Starts a new attempt. Refused while another attempt is in flight.
    pub(crate) fn begin(&mut self, schedule: CampaignSchedule, request: LaunchRequest) -> bool {
        if self.is_in_flight() {
            return false;
        }
        *self = CampaignPhase::Scheduling { schedule, request };
        true
    }

    /// Moves `Scheduling` to `ScheduleSubmitted` and hands back the request to launch.
    pub(crate) fn schedule_accepted(&mut self) -> Option<LaunchRequest> {
        match mem::take(self) {
            CampaignPhase::Scheduling { schedule, request } => {
                let launch = request.clone();
                *self = CampaignPhase::ScheduleSubmitted { schedule, request };
                Some(launch)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    pub(crate) fn schedule_rejected(&mut self, failure: Failure) -> bool {
        if !matches!(self, CampaignPhase::Scheduling { .. }) {
            return false;
        }
        *self = CampaignPhase::ScheduleFailed { failure };
        true
    }

    pub(crate) fn launch_succeeded(&mut self, message: String) -> bool {
        match mem::take(self) {
            CampaignPhase::ScheduleSubmitted { schedule, .. } => {
                *self = CampaignPhase::Launched {
                    project_name: schedule.project_name,
                    message,
                };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    pub(crate) fn launch_failed(&mut self, failure: Failure) -> bool {
        match mem::take(self) {
            CampaignPhase::ScheduleSubmitted { schedule, .. } => {
                *self = CampaignPhase::LaunchFailed {
                    project_name: schedule.project_name,
                    failure,
                };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Dismissal returns a settled attempt to `Idle`; in-flight attempts are kept.
    pub(crate) fn dismiss(&mut self) -> bool {
        if self.is_in_flight() || *self == CampaignPhase::Idle {
            return false;
        }
        *self = CampaignPhase::Idle;
        true
    }
}
