//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Any failure to obtain robots.txt fails open: crawling is never blocked by a
//! missing or broken file.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::ParsedRobots;

use crate::crawler::{FetchOutcome, HttpFetcher};
use std::time::Duration;
use url::Url;

/// Fetches robots.txt for an origin root
///
/// A single attempt is made. Anything other than a 2xx response yields
/// [`ParsedRobots::allow_all`].
///
/// # Arguments
///
/// * `fetcher` - The run's HTTP fetcher
/// * `origin` - Origin root whose `/robots.txt` is requested
/// * `timeout` - Request timeout
///
/// # Returns
///
/// The parsed rules, or a permissive set when the file is unavailable
pub async fn fetch_robots(fetcher: &HttpFetcher, origin: &str, timeout: Duration) -> ParsedRobots {
    let robots_url = match Url::parse(origin).and_then(|o| o.join("/robots.txt")) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", origin, e);
            return ParsedRobots::allow_all();
        }
    };

    match fetcher.fetch_once(robots_url.as_str(), timeout).await {
        FetchOutcome::Success { body, .. } => ParsedRobots::from_content(&body),
        FetchOutcome::Unavailable { error, .. } => {
            tracing::debug!("robots.txt unavailable for {} ({}), allowing all", origin, error);
            ParsedRobots::allow_all()
        }
    }
}

/// Allow/deny decisions for page fetches, backed by a per-run cache
pub struct RobotsGate {
    cache: RobotsCache,
    user_agent: String,
    timeout: Duration,
}

impl RobotsGate {
    /// # Arguments
    ///
    /// * `user_agent` - Product token matched against `User-agent:` groups
    /// * `timeout` - Timeout for robots.txt requests
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            cache: RobotsCache::new(),
            user_agent: user_agent.into(),
            timeout,
        }
    }

    pub fn cache(&self) -> &RobotsCache {
        &self.cache
    }

    /// Checks whether `path` under `origin` may be fetched
    ///
    /// robots.txt is fetched on the first check against an origin and cached
    /// for the rest of the run.
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Used for the robots.txt request on a cache miss
    /// * `origin` - Origin root of the page
    /// * `path` - Path plus query of the page
    ///
    /// # Returns
    ///
    /// * `true` - The page may be fetched, or robots.txt was unavailable
    /// * `false` - A rule for the crawler's product token disallows it
    pub async fn is_allowed(&self, fetcher: &HttpFetcher, origin: &str, path: &str) -> bool {
        let robots = match self.cache.get(origin) {
            Some(robots) => robots,
            None => {
                tracing::debug!("Fetching robots.txt for {}", origin);
                let fetched = fetch_robots(fetcher, origin, self.timeout).await;
                self.cache.insert(origin, fetched)
            }
        };

        let target = match Url::parse(origin).and_then(|o| o.join(path)) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        };

        robots.is_allowed(&target, &self.user_agent)
    }
}
