//! Date range selection
//!
//! An explicit start/end pair from the command line wins; otherwise the
//! range comes from an interactive prompt (with a trailing-30-days
//! default) or, in non-interactive mode, the trailing 30 days directly.

use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use clap::ValueEnum;

/// Fallback window length when no explicit range is given
pub const DEFAULT_RANGE_DAYS: i64 = 30;

/// How to pick a date range when none is given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DateRangeMode {
    /// Prompt on stdin, defaulting to the trailing 30 days
    Interactive,
    /// Use the trailing 30 days without prompting
    Args,
}

/// Selects the analysis date range for the given mode
pub fn select_date_range(mode: DateRangeMode) -> Result<(NaiveDate, NaiveDate)> {
    let end = Utc::now().date_naive();
    let start = end - Duration::days(DEFAULT_RANGE_DAYS);

    match mode {
        DateRangeMode::Args => Ok((start, end)),
        DateRangeMode::Interactive => {
            let start = prompt_date("Start date", start)?;
            let end = prompt_date("End date", end)?;
            Ok((start, end))
        }
    }
}

fn prompt_date(label: &str, default: NaiveDate) -> Result<NaiveDate> {
    print!("{} [{}]: ", label, default.format("%Y-%m-%d"));
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read date from stdin")?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(default);
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", trimmed))
}

/// Midnight at the start of the given date
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last instant of the given date, so records from the end date itself are
/// included in the window
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).expect("valid end-of-day time"),
    )
}
