//! Lead harvest coordinator - main orchestration logic
//!
//! This module drives a whole run:
//! - Running site discovery and merging in the caller's seed URLs
//! - Reducing candidates to distinct site roots in a reproducible order
//! - Crawling domains one by one until the lead target is reached
//! - Filtering, deduplicating and recording every per-domain outcome

use crate::config::Config;
use crate::crawler::domain::CrawlSession;
use crate::crawler::filter::RegionFilter;
use crate::discovery::SiteDiscovery;
use crate::output::RunStatistics;
use crate::state::{DomainOutcome, Lead, SkipReason};
use crate::url::{normalize_domain, reduce_to_roots, root_of, DiscoveredRoot};
use crate::RippleError;
use std::collections::{BTreeSet, HashSet};

/// Everything a run needs to know about what to harvest
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    pub keywords: Vec<String>,
    pub regions: Vec<String>,

    /// URLs crawled in addition to discovery results
    pub seeds: Vec<String>,

    /// The run stops once this many leads were accepted
    pub target: usize,

    /// Case-insensitive pattern a lead's location must match
    pub region_filter: Option<String>,

    /// Result links collected by discovery before it stops querying
    pub max_results: usize,
}

impl HarvestRequest {
    pub fn from_config(config: &Config) -> Self {
        Self {
            keywords: config.search.keywords.clone(),
            regions: config.search.regions.clone(),
            seeds: config.search.seeds.clone(),
            target: config.crawler.target,
            region_filter: config.filter.region_pattern.clone(),
            max_results: config.search.max_results,
        }
    }
}

/// Result of a run
#[derive(Debug, Clone, Default)]
pub struct HarvestReport {
    /// Accepted leads in processing order, at most `target`
    pub leads: Vec<Lead>,

    /// Candidates that produced no lead, with the reason
    pub skipped: Vec<(String, SkipReason)>,

    pub stats: RunStatistics,

    /// The run was cancelled before candidates ran out or the target was met
    pub cancelled: bool,
}

/// Main harvest coordinator structure
pub struct Coordinator {
    session: CrawlSession,
    discovery: SiteDiscovery,
}

impl Coordinator {
    pub fn new(session: CrawlSession, discovery: SiteDiscovery) -> Self {
        Self { session, discovery }
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Runs a harvest without progress reporting
    pub async fn run(&self, request: &HarvestRequest) -> HarvestReport {
        self.run_with_progress(request, |_, _, _| {}).await
    }

    /// Runs a harvest
    ///
    /// `progress` is called after every processed candidate with the
    /// processed count, the total candidate count and the lead accepted for
    /// that candidate, if any.
    ///
    /// # Arguments
    ///
    /// * `request` - Queries, seeds, target and region filter of the run
    /// * `progress` - Callback invoked once per processed candidate
    ///
    /// # Returns
    ///
    /// A HarvestReport with at most `request.target` leads, every skip and
    /// the run statistics
    pub async fn run_with_progress<F>(&self, request: &HarvestRequest, mut progress: F) -> HarvestReport
    where
        F: FnMut(usize, usize, Option<&Lead>),
    {
        let mut report = HarvestReport {
            stats: RunStatistics::new(request.target as u64),
            ..HarvestReport::default()
        };

        let discovered = self
            .session
            .until_cancelled(self.discovery.discover(
                &request.keywords,
                &request.regions,
                request.max_results,
            ))
            .await
            .unwrap_or_default();

        let mut candidates: BTreeSet<String> = discovered;
        candidates.extend(request.seeds.iter().map(|s| s.trim().to_string()));

        for candidate in candidates.iter().filter(|c| !is_normalizable(c)) {
            report.stats.record_skip(&SkipReason::Unnormalizable);
            report
                .skipped
                .push((candidate.clone(), SkipReason::Unnormalizable));
        }

        let roots = reduce_to_roots(candidates);
        let total = roots.len();
        report.stats.candidates = total as u64;
        tracing::info!("{} candidate sites after deduplication", total);

        let filter = RegionFilter::new(request.region_filter.as_deref());
        let mut produced: HashSet<String> = HashSet::new();

        for root in &roots {
            if report.leads.len() >= request.target {
                break;
            }
            if self.session.cancellation_token().is_cancelled() {
                report.cancelled = true;
                break;
            }

            let outcome = self.process_root(root, &produced, &filter).await;
            report.stats.processed += 1;
            let processed = report.stats.processed as usize;

            match outcome {
                DomainOutcome::Accepted(lead) => {
                    tracing::info!("Accepted lead for {}: {}", root.domain, lead.name);
                    produced.insert(root.domain.clone());
                    report.stats.accepted += 1;
                    progress(processed, total, Some(&lead));
                    report.leads.push(lead);
                }
                DomainOutcome::Skipped(reason) => {
                    tracing::debug!("Skipped {}: {}", root.root, reason);
                    if reason == SkipReason::Cancelled {
                        report.cancelled = true;
                    }
                    report.stats.record_skip(&reason);
                    progress(processed, total, None);
                    report.skipped.push((root.root.clone(), reason));
                }
            }

            if report.cancelled {
                break;
            }

            if report.leads.len() < request.target {
                let pause = self.session.throttle().domain.sample();
                if self.session.pause(pause).await.is_err() {
                    report.cancelled = true;
                    break;
                }
            }
        }

        report.stats.target_reached = report.leads.len() >= request.target;
        tracing::debug!(
            "robots.txt cached for {} origins",
            self.session.robots().cache().len()
        );
        report.stats.cancelled = report.cancelled;

        if report.cancelled {
            tracing::warn!("Run cancelled with {} leads", report.leads.len());
        } else if report.stats.target_reached {
            tracing::info!("Target of {} leads reached", request.target);
        } else {
            tracing::info!(
                "Candidates exhausted with {} of {} leads",
                report.leads.len(),
                request.target
            );
        }

        report
    }

    /// Crawls one candidate root and decides whether its lead is kept
    pub async fn process_root(
        &self,
        root: &DiscoveredRoot,
        produced: &HashSet<String>,
        filter: &RegionFilter,
    ) -> DomainOutcome {
        if produced.contains(&root.domain) {
            return DomainOutcome::Skipped(SkipReason::AlreadyProduced);
        }

        let lead = match self.session.crawl_domain(&root.root).await {
            Ok(lead) => lead,
            Err(RippleError::Cancelled) => return DomainOutcome::Skipped(SkipReason::Cancelled),
            Err(e) => {
                tracing::warn!("Crawl of {} failed: {}", root.root, e);
                return DomainOutcome::Skipped(SkipReason::CrawlFailed(e.to_string()));
            }
        };

        screen_lead(lead, filter)
    }
}

/// Applies the region filter and the identity check to a crawled lead
fn screen_lead(lead: Lead, filter: &RegionFilter) -> DomainOutcome {
    if !filter.matches(&lead.location) {
        return DomainOutcome::Skipped(SkipReason::RegionMismatch);
    }

    if !lead.has_identity() {
        return DomainOutcome::Skipped(SkipReason::MissingIdentity);
    }

    DomainOutcome::Accepted(lead)
}

fn is_normalizable(candidate: &str) -> bool {
    root_of(candidate)
        .ok()
        .and_then(|root| normalize_domain(&root))
        .is_some()
}
