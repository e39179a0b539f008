//! Output error and summary types

use crate::output::RunStatistics;
use crate::state::Lead;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything the markdown summary reports about one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    // Run metadata
    pub run_id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub duration_seconds: Option<u64>,
    pub status: String,
    pub config_hash: String,

    pub stats: RunStatistics,

    /// Leads in acceptance order
    pub leads: Vec<Lead>,
}

impl RunSummary {
    /// Share of accepted leads that carry a phone number, as a percentage
    pub fn phone_coverage(&self) -> f64 {
        coverage(&self.leads, |lead| !lead.phone.is_empty())
    }

    /// Share of accepted leads that carry a location snippet, as a percentage
    pub fn location_coverage(&self) -> f64 {
        coverage(&self.leads, |lead| !lead.location.is_empty())
    }
}

fn coverage<F: Fn(&Lead) -> bool>(leads: &[Lead], has: F) -> f64 {
    if leads.is_empty() {
        return 0.0;
    }
    let count = leads.iter().filter(|lead| has(lead)).count();
    (count as f64 / leads.len() as f64) * 100.0
}
