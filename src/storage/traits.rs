//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::output::RunStatistics;
use crate::state::{Lead, SkipReason};
use crate::storage::{RunRecord, RunStatus};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
pub trait Storage {
    // ===== Run Management =====

    /// Creates a new run in the `running` state and returns its ID
    fn create_run(&mut self, config_hash: &str, target: u64) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Records the final status and counters of a run with a finish timestamp
    fn complete_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        stats: &RunStatistics,
    ) -> StorageResult<()>;

    // ===== Leads =====

    /// Stores an accepted lead
    ///
    /// Returns `false` when the run already holds a lead for `domain`.
    fn insert_lead(&mut self, run_id: i64, domain: &str, lead: &Lead) -> StorageResult<bool>;

    /// Loads the leads of a run in insertion order
    fn load_leads(&self, run_id: i64) -> StorageResult<Vec<Lead>>;

    /// Counts the leads of a run
    fn count_leads(&self, run_id: i64) -> StorageResult<u64>;

    // ===== Skips =====

    /// Records a candidate that produced no lead
    fn record_skip(&mut self, run_id: i64, candidate: &str, reason: &SkipReason)
        -> StorageResult<()>;

    /// Skip counts of a run keyed by reason label
    fn skip_counts(&self, run_id: i64) -> StorageResult<BTreeMap<String, u64>>;
}
