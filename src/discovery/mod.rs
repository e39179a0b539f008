//! Site discovery through external search providers
//!
//! Keywords and regions are expanded into queries, each query goes to one
//! configured provider, and the result links with a registrable domain are
//! collected. Discovery never crawls anything itself.

mod bing;
mod provider;
mod serpapi;

pub use bing::BingProvider;
pub use provider::{DiscoveryError, SearchProvider};
pub use serpapi::SerpApiProvider;

use crate::crawler::{Pause, Sleeper, Throttle};
use crate::url::normalize_domain;
use reqwest::Client;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Builds the query list: `"keyword region"` for every region, then the bare keyword
///
/// # Examples
///
/// ```
/// use lead_ripple::discovery::build_queries;
///
/// let queries = build_queries(&["yacht charter".to_string()], &["Miami".to_string()]);
/// assert_eq!(queries, vec!["yacht charter Miami", "yacht charter"]);
/// ```
pub fn build_queries(keywords: &[String], regions: &[String]) -> Vec<String> {
    let mut queries = Vec::with_capacity(keywords.len() * (regions.len() + 1));

    for keyword in keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        for region in regions.iter().map(|r| r.trim()).filter(|r| !r.is_empty()) {
            queries.push(format!("{} {}", keyword, region));
        }
        queries.push(keyword.to_string());
    }

    queries
}

/// Picks the provider for a run: SerpAPI if a key is set, else Bing, else none
pub fn select_provider(
    client: &Client,
    serpapi_key: Option<&str>,
    bing_key: Option<&str>,
) -> Option<Box<dyn SearchProvider>> {
    fn present(key: Option<&str>) -> Option<&str> {
        key.map(str::trim).filter(|k| !k.is_empty())
    }

    if let Some(key) = present(serpapi_key) {
        return Some(Box::new(SerpApiProvider::new(client.clone(), key)));
    }
    if let Some(key) = present(bing_key) {
        return Some(Box::new(BingProvider::new(client.clone(), key)));
    }
    None
}

/// Runs queries against one provider and collects candidate URLs
pub struct SiteDiscovery {
    provider: Option<Box<dyn SearchProvider>>,
    sleeper: Arc<dyn Sleeper>,
    query_pause: Pause,
}

impl SiteDiscovery {
    pub fn new(provider: Option<Box<dyn SearchProvider>>, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            provider,
            sleeper,
            query_pause: Throttle::default().query,
        }
    }

    pub fn with_query_pause(mut self, pause: Pause) -> Self {
        self.query_pause = pause;
        self
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Collects result links for every query until `max_results` links are gathered
    ///
    /// Without a provider the result is empty. A failing query is logged
    /// and discovery continues with the next one.
    pub async fn discover(
        &self,
        keywords: &[String],
        regions: &[String],
        max_results: usize,
    ) -> BTreeSet<String> {
        let mut found = BTreeSet::new();

        let Some(provider) = &self.provider else {
            tracing::info!("No search provider configured, skipping discovery");
            return found;
        };

        let queries = build_queries(keywords, regions);
        tracing::info!(
            "Running {} search queries through {}",
            queries.len(),
            provider.name()
        );

        for query in &queries {
            match provider.search(query).await {
                Ok(links) => {
                    let before = found.len();
                    found.extend(links.into_iter().filter(|l| normalize_domain(l).is_some()));
                    tracing::debug!("Query {:?}: {} new results", query, found.len() - before);
                }
                Err(e) => {
                    tracing::warn!("Query {:?} failed on {}: {}", query, provider.name(), e);
                }
            }

            let pause = self.query_pause.sample();
            if !pause.is_zero() {
                self.sleeper.sleep(pause).await;
            }

            if found.len() >= max_results {
                tracing::debug!("Reached {} discovery results, stopping", found.len());
                break;
            }
        }

        found
    }
}
