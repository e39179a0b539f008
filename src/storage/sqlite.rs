//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::output::RunStatistics;
use crate::state::{Lead, SkipReason};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::RippleError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, started_at, finished_at, config_hash, status, target, candidates, processed, accepted";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> Result<Self, RippleError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, RippleError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
        target: row.get::<_, i64>(5)? as u64,
        candidates: row.get::<_, i64>(6)? as u64,
        processed: row.get::<_, i64>(7)? as u64,
        accepted: row.get::<_, i64>(8)? as u64,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, target: u64) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status, target) VALUES (?1, ?2, ?3, ?4)",
            params![
                now,
                config_hash,
                RunStatus::Running.to_db_string(),
                target as i64
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        Ok(self.conn.query_row(&sql, [], run_from_row).optional()?)
    }

    fn complete_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        stats: &RunStatistics,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, candidates = ?3, processed = ?4, accepted = ?5
             WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                stats.candidates as i64,
                stats.processed as i64,
                stats.accepted as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Leads =====

    fn insert_lead(&mut self, run_id: i64, domain: &str, lead: &Lead) -> StorageResult<bool> {
        let now = Utc::now().to_rfc3339();
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO leads
             (run_id, domain, name, website, phone, email, location, source_page, produced_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                run_id,
                domain,
                lead.name,
                lead.website,
                lead.phone,
                lead.email,
                lead.location,
                lead.source_page,
                now
            ],
        )?;
        Ok(inserted > 0)
    }

    fn load_leads(&self, run_id: i64) -> StorageResult<Vec<Lead>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, website, phone, email, location, source_page
             FROM leads WHERE run_id = ?1 ORDER BY id",
        )?;

        let leads = stmt
            .query_map(params![run_id], |row| {
                Ok(Lead {
                    name: row.get(0)?,
                    website: row.get(1)?,
                    phone: row.get(2)?,
                    email: row.get(3)?,
                    location: row.get(4)?,
                    source_page: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(leads)
    }

    fn count_leads(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM leads WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ===== Skips =====

    fn record_skip(
        &mut self,
        run_id: i64,
        candidate: &str,
        reason: &SkipReason,
    ) -> StorageResult<()> {
        let detail = match reason {
            SkipReason::CrawlFailed(message) => Some(message.as_str()),
            _ => None,
        };
        self.conn.execute(
            "INSERT INTO skips (run_id, candidate, reason, detail) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, candidate, reason.label(), detail],
        )?;
        Ok(())
    }

    fn skip_counts(&self, run_id: i64) -> StorageResult<BTreeMap<String, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT reason, COUNT(*) FROM skips WHERE run_id = ?1 GROUP BY reason",
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (reason, count) = row?;
            counts.insert(reason, count as u64);
        }

        Ok(counts)
    }
}
