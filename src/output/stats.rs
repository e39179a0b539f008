//! Run statistics
//!
//! Counters accumulated by the coordinator during a run, reloadable from
//! storage for `--stats`.

use crate::state::SkipReason;
use crate::storage::{RunRecord, RunStatus, Storage};
use crate::RippleError;
use std::collections::BTreeMap;

/// Run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Distinct site roots after deduplication
    pub candidates: u64,

    /// Roots taken through the per-domain pipeline
    pub processed: u64,

    /// Leads accepted
    pub accepted: u64,

    /// Skipped candidates by reason label
    pub skipped: BTreeMap<String, u64>,

    /// Requested lead count
    pub target: u64,

    pub target_reached: bool,

    pub cancelled: bool,
}

impl RunStatistics {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.label().to_string()).or_insert(0) += 1;
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    /// Accepted leads as a percentage of processed candidates
    pub fn acceptance_rate(&self) -> f64 {
        if self.processed == 0 {
            return 0.0;
        }
        (self.accepted as f64 / self.processed as f64) * 100.0
    }
}

/// Rebuilds the statistics of a stored run
pub fn load_statistics(storage: &dyn Storage, run: &RunRecord) -> Result<RunStatistics, RippleError> {
    let skipped = storage.skip_counts(run.id)?;

    Ok(RunStatistics {
        candidates: run.candidates,
        processed: run.processed,
        accepted: run.accepted,
        skipped,
        target: run.target,
        target_reached: run.accepted >= run.target,
        cancelled: run.status == RunStatus::Interrupted,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Overview:");
    println!("  Candidate sites: {}", stats.candidates);
    println!("  Processed: {}", stats.processed);
    println!("  Accepted leads: {} / {} target", stats.accepted, stats.target);
    println!();

    if !stats.skipped.is_empty() {
        println!("Skipped ({}):", stats.total_skipped());
        let mut reasons: Vec<_> = stats.skipped.iter().collect();
        reasons.sort_by(|a, b| b.1.cmp(a.1));

        for (reason, count) in reasons {
            println!("  {}: {}", reason, count);
        }
        println!();
    }

    let outcome = if stats.cancelled {
        "interrupted"
    } else if stats.target_reached {
        "target reached"
    } else {
        "candidates exhausted"
    };

    println!(
        "Acceptance Rate: {:.1}% ({})",
        stats.acceptance_rate(),
        outcome
    );
}
