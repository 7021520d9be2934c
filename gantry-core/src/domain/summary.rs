//! Run summary
//!
//! The single structured outcome of one pipeline execution. Created when a
//! run starts, mutated in place as stages complete or terminate early, and
//! returned exactly once.

use serde::{Deserialize, Serialize};

use crate::domain::window::{TimeBound, TimeWindow};

/// Outcome of one workflow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Whether the clustering analysis produced a usable result
    #[serde(default)]
    pub analysis_success: bool,
    /// Number of maintenance tasks persisted this run
    #[serde(default)]
    pub tasks_created: u64,
    /// Human-readable failure and termination reasons, in occurrence order
    #[serde(default)]
    pub errors: Vec<String>,
    /// Echo of the window start in canonical textual form
    pub period_start: Option<String>,
    /// Echo of the window end in canonical textual form
    pub period_end: Option<String>,
}

impl RunSummary {
    /// Fresh summary for a run over the given window
    pub fn for_window(window: &TimeWindow) -> Self {
        Self {
            analysis_success: false,
            tasks_created: 0,
            errors: Vec::new(),
            period_start: window.start.as_ref().map(TimeBound::as_text),
            period_end: window.end.as_ref().map(TimeBound::as_text),
        }
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_defaults_for_fresh_summary() {
        let summary = RunSummary::for_window(&TimeWindow::unbounded());

        assert!(!summary.analysis_success);
        assert_eq!(summary.tasks_created, 0);
        assert!(summary.errors.is_empty());
        assert_eq!(summary.period_start, None);
        assert_eq!(summary.period_end, None);
    }

    #[test]
    fn test_period_echo_uses_canonical_text() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap();
        let window = TimeWindow::new(Some(start.into()), Some(end.into()));

        let summary = RunSummary::for_window(&window);

        assert_eq!(summary.period_start.as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(
            summary.period_end.as_deref(),
            Some("2024-01-31T23:59:59.999999")
        );
    }

    #[test]
    fn test_text_bounds_pass_through() {
        let window = TimeWindow::new(Some("2024-03-01".into()), None);

        let summary = RunSummary::for_window(&window);

        assert_eq!(summary.period_start.as_deref(), Some("2024-03-01"));
        assert_eq!(summary.period_end, None);
    }

    #[test]
    fn test_errors_accumulate_in_order() {
        let mut summary = RunSummary::for_window(&TimeWindow::unbounded());
        summary.record_error("first");
        summary.record_error("second");

        assert_eq!(summary.errors, vec!["first", "second"]);
    }

    #[test]
    fn test_serializes_to_flat_record() {
        let mut summary = RunSummary::for_window(&TimeWindow::unbounded());
        summary.analysis_success = true;
        summary.tasks_created = 4;

        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["analysis_success"], true);
        assert_eq!(value["tasks_created"], 4);
        assert_eq!(value["errors"], serde_json::json!([]));
        assert_eq!(value["period_start"], serde_json::Value::Null);
    }
}
