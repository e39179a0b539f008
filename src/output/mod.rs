//! Output module for harvest summaries and exports
//!
//! This module handles:
//! - Generating markdown summaries of a run
//! - Exporting leads as CSV
//! - Run statistics

mod csv_export;
mod markdown;
pub mod stats;
mod traits;

pub use csv_export::{format_csv, write_csv};
pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{load_statistics, print_statistics, RunStatistics};
pub use traits::{OutputError, OutputResult, RunSummary};

use crate::storage::Storage;
use crate::RippleError;

/// Builds the summary of a stored run
pub fn generate_summary(storage: &dyn Storage, run_id: i64) -> Result<RunSummary, RippleError> {
    let run = storage.get_run(run_id)?;

    let duration_seconds = if let (Ok(started), Some(finished_str)) = (
        run.started_at.parse::<chrono::DateTime<chrono::Utc>>(),
        &run.finished_at,
    ) {
        finished_str
            .parse::<chrono::DateTime<chrono::Utc>>()
            .ok()
            .map(|finished| (finished - started).num_seconds().max(0) as u64)
    } else {
        None
    };

    let stats = load_statistics(storage, &run)?;
    let leads = storage.load_leads(run_id)?;

    Ok(RunSummary {
        run_id: run.id,
        started_at: run.started_at,
        finished_at: run.finished_at,
        duration_seconds,
        status: run.status.to_db_string().to_string(),
        config_hash: run.config_hash,
        stats,
        leads,
    })
}
