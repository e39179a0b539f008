use crate::discovery::provider::{DiscoveryError, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const BING_BASE_URL: &str = "https://api.bing.microsoft.com";
const SUBSCRIPTION_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Bing Web Search API v7
pub struct BingProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<WebPages>,
}

#[derive(Debug, Deserialize)]
struct WebPages {
    #[serde(default)]
    value: Vec<WebPage>,
}

#[derive(Debug, Deserialize)]
struct WebPage {
    url: Option<String>,
}

impl BingProvider {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: BING_BASE_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Points the provider at another host, e.g. a local mock server
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SearchProvider for BingProvider {
    fn name(&self) -> &'static str {
        "bing"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, DiscoveryError> {
        let endpoint = format!("{}/v7.0/search", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&endpoint)
            .header(SUBSCRIPTION_HEADER, self.api_key.as_str())
            .query(&[("q", query), ("count", "10"), ("mkt", "en-US")])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Status(response.status().as_u16()));
        }

        let body: BingResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

        Ok(body
            .web_pages
            .map(|pages| pages.value.into_iter().filter_map(|page| page.url).collect())
            .unwrap_or_default())
    }
}
