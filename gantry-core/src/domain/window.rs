//! Analysis window and query filter construction
//!
//! A run is scoped by an optional time window over the `resolved_at` column
//! of the downtime table. Either endpoint may be absent independently; the
//! window translates into a `field.operator` filter map consumed by the
//! store client.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// Canonical textual form for timestamp filter values and summary echoes
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One endpoint of an analysis window
///
/// Timestamps are serialized to their canonical textual form when used;
/// pre-formatted text passes through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeBound {
    Timestamp(NaiveDateTime),
    Text(String),
}

impl TimeBound {
    /// Textual form of this bound, as sent to the store and echoed in the
    /// run summary
    pub fn as_text(&self) -> String {
        match self {
            TimeBound::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
            TimeBound::Text(raw) => raw.clone(),
        }
    }
}

impl From<NaiveDateTime> for TimeBound {
    fn from(ts: NaiveDateTime) -> Self {
        TimeBound::Timestamp(ts)
    }
}

impl From<&str> for TimeBound {
    fn from(raw: &str) -> Self {
        TimeBound::Text(raw.to_string())
    }
}

impl From<String> for TimeBound {
    fn from(raw: String) -> Self {
        TimeBound::Text(raw)
    }
}

/// Optional start/end bound scoping one workflow run
///
/// No ordering between start and end is enforced; an inverted window simply
/// matches no records at the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeWindow {
    pub start: Option<TimeBound>,
    pub end: Option<TimeBound>,
}

impl TimeWindow {
    pub fn new(start: Option<TimeBound>, end: Option<TimeBound>) -> Self {
        Self { start, end }
    }

    /// Window with no bounds; matches every record
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Query filters in the `field.operator` key convention
///
/// Keys are unique and iteration order is stable. A key without an operator
/// suffix is treated as an equality match by the store client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryFilters(BTreeMap<String, String>);

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the filter map for a window over the `resolved_at` column
    ///
    /// Each present endpoint contributes exactly one entry:
    /// `resolved_at.gte` for the start, `resolved_at.lte` for the end.
    pub fn from_window(window: &TimeWindow) -> Self {
        let mut filters = Self::new();
        if let Some(start) = &window.start {
            filters.insert("resolved_at.gte", start.as_text());
        }
        if let Some(end) = &window.end {
            filters.insert("resolved_at.lte", end.as_text());
        }
        filters
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_filters_empty_for_unbounded_window() {
        let filters = QueryFilters::from_window(&TimeWindow::unbounded());
        assert!(filters.is_empty());
    }

    #[test]
    fn test_filters_start_only() {
        let window = TimeWindow::new(Some(timestamp(2024, 1, 1, 0, 0, 0).into()), None);
        let filters = QueryFilters::from_window(&window);

        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("resolved_at.gte"), Some("2024-01-01T00:00:00"));
        assert_eq!(filters.get("resolved_at.lte"), None);
    }

    #[test]
    fn test_filters_end_only() {
        let window = TimeWindow::new(None, Some(timestamp(2024, 1, 31, 23, 59, 59).into()));
        let filters = QueryFilters::from_window(&window);

        assert_eq!(filters.len(), 1);
        assert_eq!(filters.get("resolved_at.lte"), Some("2024-01-31T23:59:59"));
    }

    #[test]
    fn test_filters_both_bounds() {
        let window = TimeWindow::new(
            Some(timestamp(2024, 1, 1, 0, 0, 0).into()),
            Some(timestamp(2024, 1, 31, 23, 59, 59).into()),
        );
        let filters = QueryFilters::from_window(&window);

        assert_eq!(filters.len(), 2);
        assert_eq!(filters.get("resolved_at.gte"), Some("2024-01-01T00:00:00"));
        assert_eq!(filters.get("resolved_at.lte"), Some("2024-01-31T23:59:59"));
    }

    #[test]
    fn test_text_bound_passes_through_unchanged() {
        let window = TimeWindow::new(Some("2024-01-01T08:30:00".into()), None);
        let filters = QueryFilters::from_window(&window);

        assert_eq!(filters.get("resolved_at.gte"), Some("2024-01-01T08:30:00"));
    }

    #[test]
    fn test_subsecond_timestamp_keeps_microseconds() {
        let end = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 999_999)
            .unwrap();

        assert_eq!(
            TimeBound::from(end).as_text(),
            "2024-01-31T23:59:59.999999"
        );
    }
}
