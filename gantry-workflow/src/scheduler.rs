//! Maintenance task scheduling
//!
//! Builds concrete maintenance tasks from service candidates. Due dates
//! follow the priority lead time. The scheduler holds its own reference to
//! the record store so it can report which machines already have an open
//! task on file.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use gantry_core::domain::task::{MaintenanceSchedule, MaintenanceTask, ServiceCandidate, TaskStatus};
use gantry_core::domain::window::QueryFilters;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::RecordStore;

/// Table holding persisted maintenance tasks
pub const TASKS_TABLE: &str = "scheduled_maintenance_tasks";

/// Row limit when scanning for open tasks
const OPEN_TASKS_LIMIT: u32 = 1000;

/// Schedules maintenance tasks for machines needing service
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Builds one task per candidate
    async fn schedule(&self, machines: &[ServiceCandidate]) -> anyhow::Result<MaintenanceSchedule>;

    /// Machines that already have an open scheduled task on file
    async fn open_machine_ids(&self) -> anyhow::Result<HashSet<String>>;
}

/// Store-backed implementation of TaskScheduler
pub struct StoreTaskScheduler {
    store: Arc<dyn RecordStore>,
}

impl StoreTaskScheduler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskScheduler for StoreTaskScheduler {
    async fn schedule(&self, machines: &[ServiceCandidate]) -> anyhow::Result<MaintenanceSchedule> {
        let now = Utc::now();

        let tasks: Vec<MaintenanceTask> = machines
            .iter()
            .map(|candidate| MaintenanceTask {
                id: Uuid::new_v4(),
                machine_id: candidate.machine_id.clone(),
                priority: candidate.priority,
                status: TaskStatus::Open,
                description: format!(
                    "Preventive maintenance for {}: {}",
                    candidate.machine_id, candidate.reason
                ),
                due_date: now + candidate.priority.lead_time(),
                created_at: now,
            })
            .collect();

        info!("Scheduled {} maintenance task(s)", tasks.len());

        Ok(MaintenanceSchedule { tasks })
    }

    async fn open_machine_ids(&self) -> anyhow::Result<HashSet<String>> {
        let mut filters = QueryFilters::new();
        filters.insert("status.eq", "open");

        let rows = self
            .store
            .query(TASKS_TABLE, "machine_id,status", &filters, OPEN_TASKS_LIMIT)
            .await?;

        let ids: HashSet<String> = rows
            .iter()
            .filter_map(|row| row.get("machine_id").and_then(|v| v.as_str()))
            .map(str::to_string)
            .collect();

        debug!("{} machine(s) already have an open task", ids.len());

        Ok(ids)
    }
}
