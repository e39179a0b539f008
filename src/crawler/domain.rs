//! Bounded crawl of a single domain
//!
//! A crawl starts at the candidate URL followed by a handful of well-known
//! contact and about paths, walks same-domain links breadth first within a
//! page ceiling, and folds whatever contact data it finds into one [`Lead`].

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, FetchOutcome, HttpFetcher, RetryPolicy};
use crate::crawler::parser::{parse_html, same_domain_links};
use crate::crawler::throttle::{Sleeper, Throttle};
use crate::extract::{extract_contacts, infer_company_name};
use crate::robots::RobotsGate;
use crate::state::{CrawlState, Lead};
use crate::url::{normalize_domain, path_and_query, root_of};
use crate::{Result, RippleError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Paths tried on every domain right after the start URL
pub const CONTACT_PATHS: [&str; 6] = [
    "/contact",
    "/contact-us",
    "/about",
    "/about-us",
    "/en/contact",
    "/en/about",
];

/// Per-domain crawl limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Ceiling on visited URLs, also the frontier cap
    pub max_pages: usize,

    /// Timeout of each page request
    pub timeout: Duration,

    /// Links are followed only while fewer emails than this were collected
    pub expansion_email_threshold: usize,

    /// Same-domain links taken from one page
    pub links_per_page: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            timeout: Duration::from_secs(config.timeout_secs),
            expansion_email_threshold: config.expansion_email_threshold,
            links_per_page: config.links_per_page,
        }
    }
}

/// Shared context of a run: HTTP client, robots cache, pacing and cancellation
///
/// One session is created per run and handed to every domain crawl, so the
/// robots cache is reused across domains.
pub struct CrawlSession {
    fetcher: HttpFetcher,
    robots: RobotsGate,
    throttle: Throttle,
    settings: CrawlSettings,
    cancel: CancellationToken,
}

impl CrawlSession {
    pub fn new(fetcher: HttpFetcher, robots: RobotsGate, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            robots,
            throttle: Throttle::default(),
            settings,
            cancel: CancellationToken::new(),
        }
    }

    /// Builds a session from the configuration
    ///
    /// The robots.txt product token is the configured crawler name.
    pub fn from_config(config: &Config, sleeper: Arc<dyn Sleeper>) -> Result<Self> {
        let client = build_http_client(&config.user_agent)?;
        let policy = RetryPolicy::default().with_max_retries(config.crawler.max_retries);
        let settings = CrawlSettings::from(&config.crawler);
        let robots = RobotsGate::new(config.user_agent.crawler_name.clone(), settings.timeout);

        Ok(Self::new(
            HttpFetcher::new(client, policy, sleeper),
            robots,
            settings,
        ))
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn fetcher(&self) -> &HttpFetcher {
        &self.fetcher
    }

    pub fn robots(&self) -> &RobotsGate {
        &self.robots
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Runs `fut` unless the session is cancelled first
    pub async fn until_cancelled<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RippleError::Cancelled),
            output = fut => Ok(output),
        }
    }

    /// Waits for `duration` through the session's sleeper, aborting on cancellation
    pub async fn pause(&self, duration: Duration) -> Result<()> {
        if duration.is_zero() {
            return Ok(());
        }
        self.until_cancelled(self.fetcher.sleeper().sleep(duration))
            .await
    }

    /// Crawls one domain and produces its lead
    ///
    /// Unavailable pages and pages disallowed by robots.txt are skipped; a
    /// domain where nothing could be fetched still yields a minimal lead.
    /// Only an unusable start URL or cancellation is an error.
    ///
    /// # Arguments
    ///
    /// * `start_url` - Candidate URL, visited first; its root scopes the crawl
    ///
    /// # Returns
    ///
    /// * `Ok(Lead)` - The lead assembled from every page that was fetched
    /// * `Err(RippleError::Cancelled)` - The session was cancelled mid-crawl
    /// * `Err(_)` - The start URL has no usable HTTP(S) root
    pub async fn crawl_domain(&self, start_url: &str) -> Result<Lead> {
        let root = root_of(start_url)?;
        let root_url = Url::parse(&root)?;
        let domain = normalize_domain(&root);
        let settings = self.settings;

        let seeds = CONTACT_PATHS
            .iter()
            .filter_map(|path| root_url.join(path).ok())
            .map(|url| url.to_string());
        let mut state = CrawlState::new(start_url, &root, domain, seeds);

        tracing::debug!("Crawling {} (max {} pages)", root, settings.max_pages);

        while let Some(url) = state.next_url(settings.max_pages) {
            let page_url = match Url::parse(&url) {
                Ok(u) => u,
                Err(e) => {
                    tracing::debug!("Skipping unparseable URL {}: {}", url, e);
                    continue;
                }
            };

            let path = path_and_query(&page_url);
            let allowed = self
                .until_cancelled(self.robots.is_allowed(&self.fetcher, &root, &path))
                .await?;
            if !allowed {
                tracing::debug!("Blocked by robots.txt: {}", url);
                continue;
            }

            let outcome = self
                .until_cancelled(self.fetcher.fetch(&url, settings.timeout))
                .await?;

            let body = match outcome {
                FetchOutcome::Success { body, .. } => body,
                FetchOutcome::Unavailable { attempts, error } => {
                    tracing::debug!("Unavailable after {} attempts: {} ({})", attempts, url, error);
                    continue;
                }
            };

            // Relative links resolve against the requested URL, not the redirect target
            let parsed = parse_html(&body, &page_url);

            if state.needs_company_name() {
                let name = infer_company_name(&parsed.metadata, state.domain());
                state.set_company_name(name);
            }

            if state.record_contacts(&url, extract_contacts(&body)) {
                tracing::debug!("Contacts found on {}", url);
            }

            if state.should_expand(settings.expansion_email_threshold, settings.max_pages) {
                for link in same_domain_links(&parsed.links, &root, settings.links_per_page) {
                    state.enqueue(link, settings.max_pages);
                }
            }

            self.pause(self.throttle.page.sample()).await?;
        }

        let visited = state.visited_count();
        let lead = state.into_lead();
        tracing::debug!(
            "Finished {} after {} pages: email={:?} phone={:?}",
            root,
            visited,
            lead.email,
            lead.phone
        );

        Ok(lead)
    }
}
