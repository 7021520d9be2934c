//! Gantry CLI
//!
//! Command-line entry point for the scheduled maintenance workflow.
//! Resolves the analysis date range, constructs the workflow from
//! environment configuration, runs it, and prints a human-readable
//! summary. Workflow-level errors are carried in the summary; only setup
//! failures terminate the process with a non-zero code.

mod dates;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dates::{DateRangeMode, end_of_day, select_date_range, start_of_day};
use gantry_core::domain::summary::RunSummary;
use gantry_core::domain::window::TimeWindow;
use gantry_workflow::config::WorkflowConfig;
use gantry_workflow::workflow::MaintenanceWorkflow;

#[derive(Parser)]
#[command(name = "gantry")]
#[command(about = "Scheduled maintenance planning pipeline", long_about = None)]
struct Cli {
    /// Start date for the analysis period (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// End date for the analysis period (YYYY-MM-DD)
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Date selection mode when no explicit range is given
    #[arg(long, value_enum, default_value_t = DateRangeMode::Interactive)]
    mode: DateRangeMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gantry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting scheduled maintenance workflow");

    let cli = Cli::parse();

    let (start_date, end_date) = match (cli.start_date, cli.end_date) {
        (Some(start), Some(end)) => {
            info!("Using specified date range: {} to {}", start, end);
            (start, end)
        }
        _ => {
            let (start, end) = select_date_range(cli.mode)?;
            info!("Selected date range: {} to {}", start, end);
            (start, end)
        }
    };

    // Include every record from the end date itself
    let window = TimeWindow::new(
        Some(start_of_day(start_date).into()),
        Some(end_of_day(end_date).into()),
    );

    let config = WorkflowConfig::from_env().context("Failed to load workflow configuration")?;
    let workflow =
        MaintenanceWorkflow::new(&config).context("Failed to initialize maintenance workflow")?;

    let summary = workflow.run(window).await;

    print_summary(start_date, end_date, &summary);

    Ok(())
}

/// Print the run summary
fn print_summary(start_date: NaiveDate, end_date: NaiveDate, summary: &RunSummary) {
    println!();
    println!(
        "{}",
        "=== Scheduled Maintenance Workflow Summary ===".bold()
    );
    println!(
        "Analysis period: {} to {}",
        start_date.format("%Y-%m-%d"),
        end_date.format("%Y-%m-%d")
    );
    println!(
        "Analysis status: {}",
        if summary.analysis_success {
            "Success".green()
        } else {
            "Failed".red()
        }
    );
    println!(
        "Tasks created:   {}",
        summary.tasks_created.to_string().cyan()
    );

    if !summary.errors.is_empty() {
        println!();
        println!("{}", "Errors encountered:".bold());
        for error in &summary.errors {
            println!("  - {}", error.yellow());
        }
    }

    println!();
    println!("Workflow execution complete.");
}
