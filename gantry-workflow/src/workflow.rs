//! Scheduled maintenance workflow
//!
//! Drives the five-stage pipeline: fetch downtime records for the window,
//! run the clustering analysis, interpret the clusters into machines
//! needing service, schedule and persist maintenance tasks, and send
//! notifications. Each stage is a gate that may end the run early; every
//! outcome, including collaborator failures, is carried in the returned
//! summary. `run` never fails outward.

use std::sync::Arc;

use gantry_client::StoreClient;
use gantry_core::domain::record::DowntimeRecord;
use gantry_core::domain::summary::RunSummary;
use gantry_core::domain::window::{QueryFilters, TimeWindow};
use tracing::{error, info, warn};

use crate::analysis::{ClusterAnalyzer, StandardClusterAnalyzer};
use crate::config::WorkflowConfig;
use crate::error::WorkflowError;
use crate::interpreter::{ResultInterpreter, StandardResultInterpreter};
use crate::notifier::{Notifier, WebhookNotifier};
use crate::scheduler::{StoreTaskScheduler, TaskScheduler};
use crate::store::RecordStore;
use crate::writer::{StoreTaskWriter, TaskWriter};

/// Table holding historical downtime records
const DOWNTIME_TABLE: &str = "downtime_detail";

/// Column selection for the fetch stage
const DOWNTIME_COLUMNS: &str = "*";

/// Row limit for the fetch stage
const FETCH_LIMIT: u32 = 1000;

const NO_RECORDS_MSG: &str = "No machine records found in database for the specified period";
const NO_ANALYSIS_MSG: &str = "No results from machine clustering analysis";
const RUN_ERROR_PREFIX: &str = "Error in workflow execution: ";

/// The maintenance planning pipeline
///
/// Owns its scheduler, writer, and notifier; shares one record store
/// handle with the scheduler and writer. Constructed once, reused across
/// runs; one run at a time.
pub struct MaintenanceWorkflow {
    store: Arc<dyn RecordStore>,
    analyzer: Arc<dyn ClusterAnalyzer>,
    interpreter: Arc<dyn ResultInterpreter>,
    scheduler: Arc<dyn TaskScheduler>,
    writer: Arc<dyn TaskWriter>,
    notifier: Arc<dyn Notifier>,
}

impl MaintenanceWorkflow {
    /// Creates the workflow with its standard collaborators
    ///
    /// Validates the configuration and constructs, in order, the store
    /// client, the scheduler and writer bound to it, and the notifier.
    /// Fails without a partially initialized value if any step fails.
    pub fn new(config: &WorkflowConfig) -> Result<Self, WorkflowError> {
        if let Err(e) = config.validate() {
            error!("Invalid workflow configuration: {:#}", e);
            return Err(WorkflowError::configuration(e.to_string()));
        }

        let client = StoreClient::new(&config.store_url, &config.store_key).map_err(|e| {
            error!("Failed to initialize store client: {:#}", e);
            WorkflowError::initialization("store client", e)
        })?;

        let store: Arc<dyn RecordStore> = Arc::new(client);
        let scheduler = Arc::new(StoreTaskScheduler::new(Arc::clone(&store)));
        let writer = Arc::new(StoreTaskWriter::new(Arc::clone(&store)));
        let notifier = Arc::new(WebhookNotifier::new(config.notify_webhook_url.clone()));

        info!("Maintenance workflow initialized");

        Ok(Self {
            store,
            analyzer: Arc::new(StandardClusterAnalyzer::default()),
            interpreter: Arc::new(StandardResultInterpreter::default()),
            scheduler,
            writer,
            notifier,
        })
    }

    /// Creates the workflow from explicit collaborators
    ///
    /// Used by tests and callers that want to swap an implementation.
    pub fn with_collaborators(
        store: Arc<dyn RecordStore>,
        analyzer: Arc<dyn ClusterAnalyzer>,
        interpreter: Arc<dyn ResultInterpreter>,
        scheduler: Arc<dyn TaskScheduler>,
        writer: Arc<dyn TaskWriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            store,
            analyzer,
            interpreter,
            scheduler,
            writer,
            notifier,
        }
    }

    /// Runs the pipeline over the given window
    ///
    /// Always returns a summary; failures and early terminations are
    /// recorded in its `errors` list rather than propagated.
    pub async fn run(&self, window: TimeWindow) -> RunSummary {
        let mut summary = RunSummary::for_window(&window);

        let filters = build_filters(&window);

        info!("Fetching downtime records");
        let rows = match self
            .store
            .query(DOWNTIME_TABLE, DOWNTIME_COLUMNS, &filters, FETCH_LIMIT)
            .await
        {
            Ok(rows) => rows,
            Err(e) => return terminate_with_error(summary, "fetch", e),
        };

        if rows.is_empty() {
            warn!("{}", NO_RECORDS_MSG);
            summary.record_error(NO_RECORDS_MSG);
            return summary;
        }

        let records: Vec<DowntimeRecord> = rows.into_iter().map(DowntimeRecord::from).collect();
        info!("Retrieved {} downtime record(s)", records.len());

        info!("Running machine clustering analysis");
        let analysis = match self.analyzer.analyze(&records) {
            Ok(analysis) => analysis,
            Err(e) => return terminate_with_error(summary, "analyze", e),
        };

        let Some(analysis) = analysis else {
            warn!("{}", NO_ANALYSIS_MSG);
            summary.record_error(NO_ANALYSIS_MSG);
            return summary;
        };
        summary.analysis_success = true;

        info!("Interpreting clustering results");
        let machines = match self.interpreter.interpret(&analysis) {
            Ok(machines) => machines,
            Err(e) => return terminate_with_error(summary, "interpret", e),
        };

        if machines.is_empty() {
            info!("No machines identified for maintenance");
            return summary;
        }

        info!(
            "Scheduling maintenance tasks for {} machine(s)",
            machines.len()
        );
        let schedule = match self.scheduler.schedule(&machines).await {
            Ok(schedule) => schedule,
            Err(e) => return terminate_with_error(summary, "schedule", e),
        };

        let outcome = match self.writer.write(&schedule, self.scheduler.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => return terminate_with_error(summary, "write", e),
        };
        summary.tasks_created = outcome.tasks_created;

        if summary.tasks_created > 0 {
            info!("Sending maintenance notifications");
            if let Err(e) = self.notifier.notify(&machines).await {
                // Notification is best-effort; the recorded error must not
                // disturb the counts already in the summary.
                error!("Workflow stage 'notify' failed: {:#}", e);
                summary.record_error(format!("{}{:#}", RUN_ERROR_PREFIX, e));
            }
        }

        summary
    }
}

/// Builds the query filters for a window, logging the applied bounds
fn build_filters(window: &TimeWindow) -> QueryFilters {
    let filters = QueryFilters::from_window(window);

    match (&window.start, &window.end) {
        (Some(start), Some(end)) => info!(
            "Filtering records between {} and {}",
            start.as_text(),
            end.as_text()
        ),
        (Some(start), None) => info!("Filtering records from {} onwards", start.as_text()),
        (None, Some(end)) => info!("Filtering records up to {}", end.as_text()),
        (None, None) => info!("No analysis window supplied; fetching all records"),
    }

    filters
}

/// Records a stage failure in the summary and ends the run
fn terminate_with_error(
    mut summary: RunSummary,
    stage: &str,
    error: anyhow::Error,
) -> RunSummary {
    error!("Workflow stage '{}' failed: {:#}", stage, error);
    summary.record_error(format!("{}{:#}", RUN_ERROR_PREFIX, error));
    summary
}
