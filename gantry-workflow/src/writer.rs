//! Maintenance task persistence
//!
//! Writes scheduled tasks into the store. Machines that already have an
//! open task on file are skipped, so re-running an overlapping window does
//! not double-create tasks for still-open work.

use std::sync::Arc;

use async_trait::async_trait;
use gantry_core::domain::record::Row;
use gantry_core::domain::task::{MaintenanceSchedule, MaintenanceTask, WriteOutcome};
use serde_json::Value;
use tracing::info;

use crate::scheduler::{TASKS_TABLE, TaskScheduler};
use crate::store::RecordStore;

/// Persists a maintenance schedule
#[async_trait]
pub trait TaskWriter: Send + Sync {
    /// Writes the schedule's tasks, consulting the scheduler's open-task
    /// view for duplicate suppression
    async fn write(
        &self,
        schedule: &MaintenanceSchedule,
        scheduler: &dyn TaskScheduler,
    ) -> anyhow::Result<WriteOutcome>;
}

/// Store-backed implementation of TaskWriter
pub struct StoreTaskWriter {
    store: Arc<dyn RecordStore>,
}

impl StoreTaskWriter {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TaskWriter for StoreTaskWriter {
    async fn write(
        &self,
        schedule: &MaintenanceSchedule,
        scheduler: &dyn TaskScheduler,
    ) -> anyhow::Result<WriteOutcome> {
        let open = scheduler.open_machine_ids().await?;

        let mut rows: Vec<Row> = Vec::new();
        let mut skipped: u64 = 0;

        for task in &schedule.tasks {
            if open.contains(&task.machine_id) {
                info!(
                    "Skipping task for {}: an open task already exists",
                    task.machine_id
                );
                skipped += 1;
                continue;
            }
            rows.push(task_row(task)?);
        }

        if rows.is_empty() {
            info!("No new maintenance tasks to write");
            return Ok(WriteOutcome {
                tasks_created: 0,
                tasks_skipped: skipped,
            });
        }

        let created = self.store.insert(TASKS_TABLE, rows).await?;

        info!("Created {} maintenance task(s)", created.len());

        Ok(WriteOutcome {
            tasks_created: created.len() as u64,
            tasks_skipped: skipped,
        })
    }
}

fn task_row(task: &MaintenanceTask) -> anyhow::Result<Row> {
    match serde_json::to_value(task)? {
        Value::Object(row) => Ok(row),
        other => anyhow::bail!("task serialized to non-object value: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gantry_core::domain::task::{TaskPriority, TaskStatus};
    use gantry_core::domain::window::QueryFilters;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct RecordingStore {
        inserted: Mutex<Vec<(String, Vec<Row>)>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inserted: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RecordStore for RecordingStore {
        async fn query(
            &self,
            _table: &str,
            _columns: &str,
            _filters: &QueryFilters,
            _limit: u32,
        ) -> anyhow::Result<Vec<Row>> {
            Ok(Vec::new())
        }

        async fn insert(&self, table: &str, rows: Vec<Row>) -> anyhow::Result<Vec<Row>> {
            self.inserted
                .lock()
                .unwrap()
                .push((table.to_string(), rows.clone()));
            Ok(rows)
        }
    }

    struct FixedScheduler {
        open: HashSet<String>,
    }

    #[async_trait]
    impl TaskScheduler for FixedScheduler {
        async fn schedule(
            &self,
            _machines: &[gantry_core::domain::task::ServiceCandidate],
        ) -> anyhow::Result<MaintenanceSchedule> {
            Ok(MaintenanceSchedule::default())
        }

        async fn open_machine_ids(&self) -> anyhow::Result<HashSet<String>> {
            Ok(self.open.clone())
        }
    }

    fn task(machine_id: &str) -> MaintenanceTask {
        let now = Utc::now();
        MaintenanceTask {
            id: Uuid::new_v4(),
            machine_id: machine_id.to_string(),
            priority: TaskPriority::High,
            status: TaskStatus::Open,
            description: format!("Preventive maintenance for {}", machine_id),
            due_date: now + TaskPriority::High.lead_time(),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_write_persists_all_new_tasks() {
        let store = Arc::new(RecordingStore::new());
        let writer = StoreTaskWriter::new(store.clone());
        let scheduler = FixedScheduler {
            open: HashSet::new(),
        };
        let schedule = MaintenanceSchedule {
            tasks: vec![task("M-1"), task("M-2")],
        };

        let outcome = writer.write(&schedule, &scheduler).await.unwrap();

        assert_eq!(outcome.tasks_created, 2);
        assert_eq!(outcome.tasks_skipped, 0);

        let inserted = store.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].0, TASKS_TABLE);
        assert_eq!(inserted[0].1.len(), 2);
    }

    #[tokio::test]
    async fn test_write_skips_machines_with_open_tasks() {
        let store = Arc::new(RecordingStore::new());
        let writer = StoreTaskWriter::new(store.clone());
        let scheduler = FixedScheduler {
            open: HashSet::from(["M-1".to_string()]),
        };
        let schedule = MaintenanceSchedule {
            tasks: vec![task("M-1"), task("M-2")],
        };

        let outcome = writer.write(&schedule, &scheduler).await.unwrap();

        assert_eq!(outcome.tasks_created, 1);
        assert_eq!(outcome.tasks_skipped, 1);

        let inserted = store.inserted.lock().unwrap();
        let machine_ids: Vec<&str> = inserted[0]
            .1
            .iter()
            .filter_map(|row| row.get("machine_id").and_then(|v| v.as_str()))
            .collect();
        assert_eq!(machine_ids, vec!["M-2"]);
    }

    #[tokio::test]
    async fn test_write_with_everything_skipped_touches_nothing() {
        let store = Arc::new(RecordingStore::new());
        let writer = StoreTaskWriter::new(store.clone());
        let scheduler = FixedScheduler {
            open: HashSet::from(["M-1".to_string()]),
        };
        let schedule = MaintenanceSchedule {
            tasks: vec![task("M-1")],
        };

        let outcome = writer.write(&schedule, &scheduler).await.unwrap();

        assert_eq!(outcome.tasks_created, 0);
        assert_eq!(outcome.tasks_skipped, 1);
        assert!(store.inserted.lock().unwrap().is_empty());
    }
}
