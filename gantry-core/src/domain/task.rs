//! Maintenance task types
//!
//! Structures flowing from interpretation through scheduling to
//! persistence.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority of a scheduled maintenance task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    Medium,
    Low,
}

impl TaskPriority {
    /// How far out a task of this priority is due
    pub fn lead_time(&self) -> Duration {
        match self {
            TaskPriority::High => Duration::days(2),
            TaskPriority::Medium => Duration::days(7),
            TaskPriority::Low => Duration::days(14),
        }
    }
}

/// Lifecycle status of a maintenance task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Done,
    Cancelled,
}

/// One machine flagged for service by the result interpreter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCandidate {
    pub machine_id: String,
    pub priority: TaskPriority,
    pub reason: String,
    pub incident_count: u32,
    pub total_downtime_minutes: f64,
}

/// A maintenance task ready for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceTask {
    pub id: Uuid,
    pub machine_id: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Scheduler output: one task per service candidate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub tasks: Vec<MaintenanceTask>,
}

/// Writer output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Rows the store confirmed as created
    #[serde(default)]
    pub tasks_created: u64,
    /// Tasks dropped because the machine already had an open task
    #[serde(default)]
    pub tasks_skipped: u64,
}
