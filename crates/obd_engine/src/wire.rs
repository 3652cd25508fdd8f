//! JSON shapes exchanged with the OBD backend and their conversion into core types.

use obd_core::{
    CampaignSchedule, DbStats, Failure, FilterCounts, HealthReport, HistoryEntry, NumberList,
    ReferenceCount, RemoteService, ScrubOptions, ScrubOutcome, ScrubStage,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub msisdns: Option<NumberList>,
}

/// Numbers parsed from an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedList {
    pub total: u64,
    pub msisdns: NumberList,
}

impl From<UploadResponse> for UploadedList {
    fn from(response: UploadResponse) -> Self {
        let msisdns = response.msisdns.unwrap_or_default();
        let total = response.total.unwrap_or(msisdns.len() as u64);
        Self { total, msisdns }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FilterFlags {
    pub dnd: bool,
    pub sub: bool,
    pub unsub: bool,
    pub operator: bool,
}

impl From<&ScrubOptions> for FilterFlags {
    fn from(options: &ScrubOptions) -> Self {
        Self {
            dnd: options.dnd,
            sub: options.sub,
            unsub: options.unsub,
            operator: options.operator,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScrubRequest<'a> {
    pub msisdn_list: &'a [String],
    pub options: FilterFlags,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<&'a str>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct ReportWire {
    #[serde(default)]
    pub dnd_removed: Option<u64>,
    #[serde(default)]
    pub sub_removed: Option<u64>,
    #[serde(default)]
    pub unsub_removed: Option<u64>,
    #[serde(default)]
    pub operator_removed: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<StageWire>,
}

impl ReportWire {
    fn counts(&self) -> FilterCounts {
        FilterCounts {
            dnd: self.dnd_removed.unwrap_or(0),
            sub: self.sub_removed.unwrap_or(0),
            unsub: self.unsub_removed.unwrap_or(0),
            operator: self.operator_removed.unwrap_or(0),
        }
    }

    fn from_counts(counts: FilterCounts, stages: &[ScrubStage]) -> Self {
        Self {
            dnd_removed: Some(counts.dnd),
            sub_removed: Some(counts.sub),
            unsub_removed: Some(counts.unsub),
            operator_removed: Some(counts.operator),
            stages: stages
                .iter()
                .map(|stage| StageWire {
                    stage: stage.stage.clone(),
                    count: stage.count,
                    removed: stage.removed,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct StageWire {
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub removed: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScrubResponse {
    #[serde(default)]
    pub report: Option<ReportWire>,
    #[serde(default)]
    pub final_base_count: Option<u64>,
    #[serde(default)]
    pub final_base: Option<NumberList>,
    #[serde(default)]
    pub email_status: Option<String>,
}

/// A committed scrub plus any side-channel failure the service reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubReport {
    pub outcome: ScrubOutcome,
    pub side_channel_warning: Option<String>,
}

impl ScrubResponse {
    /// Reconciles the response against the number of MSISDNs that were sent.
    pub(crate) fn reconcile(self, total_input: u64) -> Result<ScrubReport, Failure> {
        let malformed = |detail: String| Failure::MalformedResponse {
            service: RemoteService::Scrub,
            detail,
        };
        let report = self.report.unwrap_or_default();
        // Counts without the cleaned list cannot be committed.
        let final_list = self
            .final_base
            .ok_or_else(|| malformed("scrub response carried no final_base".to_string()))?;
        if let Some(count) = self.final_base_count {
            if count != final_list.len() as u64 {
                return Err(malformed(format!(
                    "final_base_count is {count} but final_base holds {} numbers",
                    final_list.len()
                )));
            }
        }
        let survivors = final_list.len();
        let stages = report
            .stages
            .iter()
            .map(|stage| ScrubStage {
                stage: stage.stage.clone(),
                count: stage.count,
                removed: stage.removed,
            })
            .collect();
        let outcome = ScrubOutcome::new(total_input, report.counts(), final_list, stages)
            .ok_or_else(|| {
                malformed(format!(
                    "{survivors} numbers survived a scrub of {total_input}"
                ))
            })?;
        let side_channel_warning = self.email_status.filter(|status| is_failure_status(status));
        Ok(ScrubReport {
            outcome,
            side_channel_warning,
        })
    }
}

/// Side-channel statuses such as `FAILED: smtp timeout` or `error`.
pub(crate) fn is_failure_status(status: &str) -> bool {
    let upper = status.to_ascii_uppercase();
    upper.contains("FAIL") || upper.contains("ERROR")
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CountWire {
    Number(u64),
    Text(String),
}

fn reference_count(raw: Option<CountWire>) -> ReferenceCount {
    match raw {
        Some(CountWire::Number(count)) => ReferenceCount::Known(count),
        Some(CountWire::Text(text)) => ReferenceCount::Unavailable(text),
        None => ReferenceCount::default(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DbStatsResponse {
    #[serde(default)]
    pub dnd_count: Option<CountWire>,
    #[serde(default)]
    pub sub_count: Option<CountWire>,
    #[serde(default)]
    pub unsub_count: Option<CountWire>,
}

impl From<DbStatsResponse> for DbStats {
    fn from(response: DbStatsResponse) -> Self {
        Self {
            dnd_count: reference_count(response.dnd_count),
            sub_count: reference_count(response.sub_count),
            unsub_count: reference_count(response.unsub_count),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub connected_to: Option<String>,
    #[serde(default)]
    pub database_type: Option<String>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

impl From<HealthResponse> for HealthReport {
    fn from(response: HealthResponse) -> Self {
        Self {
            status: response.status,
            database: response.database,
            connected_to: response.connected_to,
            database_type: response.database_type,
            alerts: response.alerts,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionStatsWire {
    pub dnd: u64,
    pub sub: u64,
    pub unsub: u64,
    pub operator: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct LogEntryRequest<'a> {
    pub total_input: u64,
    pub final_count: u64,
    pub report: ReportWire,
    pub session_stats: SessionStatsWire,
    pub final_base: &'a [String],
}

impl<'a> LogEntryRequest<'a> {
    pub(crate) fn new(outcome: &'a ScrubOutcome, stats: &FilterCounts) -> Self {
        Self {
            total_input: outcome.total_input(),
            final_count: outcome.final_count(),
            report: ReportWire::from_counts(outcome.per_filter_removed(), outcome.stages()),
            session_stats: SessionStatsWire {
                dnd: stats.dnd,
                sub: stats.sub,
                unsub: stats.unsub,
                operator: stats.operator,
            },
            final_base: outcome.final_list(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl MessageResponse {
    pub(crate) fn into_message(self, fallback: &str) -> String {
        self.message
            .or(self.status)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub data: Vec<HistoryEntryWire>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryEntryWire {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default)]
    pub total_input: Option<u64>,
    #[serde(default)]
    pub final_count: Option<u64>,
    #[serde(default)]
    pub report: Option<ReportWire>,
    #[serde(default)]
    pub results_summary: Option<Value>,
}

fn display_value(value: Option<Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
    }
}

impl From<HistoryEntryWire> for HistoryEntry {
    fn from(entry: HistoryEntryWire) -> Self {
        Self {
            timestamp: display_value(entry.timestamp),
            total_input: entry.total_input.unwrap_or(0),
            final_count: entry.final_count.unwrap_or(0),
            per_filter_removed: entry.report.unwrap_or_default().counts(),
            results_summary: display_value(entry.results_summary),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ScheduleRequest<'a> {
    pub obd_name: &'a str,
    pub flow_name: &'a str,
    pub msc_ip: &'a str,
    pub cli: &'a str,
}

impl<'a> From<&'a CampaignSchedule> for ScheduleRequest<'a> {
    fn from(schedule: &'a CampaignSchedule) -> Self {
        Self {
            obd_name: schedule.project_name.trim(),
            flow_name: schedule.flow_name.trim(),
            msc_ip: schedule.msc_ip.trim(),
            cli: schedule.cli_mask.trim(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LaunchRequestWire<'a> {
    pub msisdn_list: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_size: Option<u64>,
}
