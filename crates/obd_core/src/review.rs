use crate::{Filter, FilterCounts, ScrubOutcome};

/// Header line of the exported artifact.
pub const EXPORT_HEADER: &str = "msisdn";

/// Latest committed scrub outcome. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReviewState {
    outcome: Option<ScrubOutcome>,
}

impl ReviewState {
    pub fn outcome(&self) -> Option<&ScrubOutcome> {
        self.outcome.as_ref()
    }

    /// Session stats; zero until a scrub is committed.
    pub fn stats(&self) -> FilterCounts {
        self.outcome
            .as_ref()
            .map(ScrubOutcome::per_filter_removed)
            .unwrap_or_default()
    }

    pub fn cleaned_list(&self) -> &[String] {
        self.outcome
            .as_ref()
            .map(ScrubOutcome::final_list)
            .unwrap_or(&[])
    }

    pub(crate) fn commit(&mut self, outcome: ScrubOutcome) {
        self.outcome = Some(outcome);
    }

    pub(crate) fn clear(&mut self) {
        self.outcome = None;
    }

    /// Share of the input removed by `filter`, in `0.0..=1.0`.
    pub fn removal_fraction(&self, filter: Filter) -> f64 {
        match &self.outcome {
            Some(outcome) => removal_fraction(
                outcome.per_filter_removed().get(filter),
                outcome.total_input(),
            ),
            None => 0.0,
        }
    }
}

pub fn removal_fraction(removed: u64, total_input: u64) -> f64 {
    if total_input == 0 {
        return 0.0;
    }
    (removed as f64 / total_input as f64).min(1.0)
}

/// Downloadable payload: header line followed by one number per line.
/// `None` when there is nothing to export.
pub fn export_payload(cleaned: &[String]) -> Option<String> {
    if cleaned.is_empty() {
        return None;
    }
    let mut payload = String::with_capacity(EXPORT_HEADER.len() + cleaned.len() * 14);
    payload.push_str(EXPORT_HEADER);
    for number in cleaned {
        payload.push('\n');
        payload.push_str(number);
    }
    Some(payload)
}

pub fn copy_all_text(cleaned: &[String]) -> String {
    cleaned.join("\n")
}
