//! Search provider abstraction

use async_trait::async_trait;
use thiserror::Error;

/// Failures of a single search query
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search provider returned HTTP {0}")]
    Status(u16),

    #[error("Malformed search response: {0}")]
    Malformed(String),
}

/// A web search backend that turns a free-text query into result URLs
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Runs one query and returns the result links in ranking order
    async fn search(&self, query: &str) -> Result<Vec<String>, DiscoveryError>;
}
