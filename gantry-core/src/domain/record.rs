//! Downtime record types
//!
//! Rows come off the wire as untyped JSON objects. The workflow never looks
//! inside a record beyond counting them; the analyzer reads individual
//! fields through the typed accessors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One untyped store row: column name to value
pub type Row = serde_json::Map<String, Value>;

/// A historical equipment stoppage, as fetched from the downtime table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DowntimeRecord(Row);

impl DowntimeRecord {
    pub fn new(row: Row) -> Self {
        Self(row)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String-valued column, if present and textual
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Numeric column, if present and a number
    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// The machine this stoppage belongs to
    pub fn machine_id(&self) -> Option<&str> {
        self.text("machine_id")
    }

    /// Minutes of downtime for this stoppage; 0 when the column is missing
    pub fn downtime_minutes(&self) -> f64 {
        self.number("downtime_minutes").unwrap_or(0.0)
    }

    /// Recorded stoppage reason
    pub fn reason(&self) -> Option<&str> {
        self.text("reason")
    }
}

impl From<Row> for DowntimeRecord {
    fn from(row: Row) -> Self {
        Self(row)
    }
}
