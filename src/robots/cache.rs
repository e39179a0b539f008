//! Per-run robots.txt cache
//!
//! Entries are keyed by origin root (`scheme://host[:port]/`), created on the
//! first check against an origin and never invalidated within a run.

use crate::robots::ParsedRobots;
use std::collections::HashMap;
use std::sync::Mutex;

/// Origin root to parsed robots rules
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<String, ParsedRobots>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rules for an origin, if any
    ///
    /// # Arguments
    ///
    /// * `origin` - Origin root in `scheme://host[:port]/` form
    ///
    /// # Returns
    ///
    /// * `Some(ParsedRobots)` - Rules fetched earlier in this run
    /// * `None` - The origin has not been checked yet
    pub fn get(&self, origin: &str) -> Option<ParsedRobots> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(origin).cloned())
    }

    /// Stores rules for an origin, keeping an existing entry if one raced in first
    ///
    /// # Arguments
    ///
    /// * `origin` - Origin root the rules belong to
    /// * `robots` - Freshly fetched rules
    ///
    /// # Returns
    ///
    /// The rules now cached for the origin, which are `robots` unless
    /// another entry was stored first
    pub fn insert(&self, origin: &str, robots: ParsedRobots) -> ParsedRobots {
        match self.entries.lock() {
            Ok(mut entries) => entries
                .entry(origin.to_string())
                .or_insert(robots)
                .clone(),
            Err(_) => robots,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
