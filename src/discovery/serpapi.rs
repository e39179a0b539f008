use crate::discovery::provider::{DiscoveryError, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const SERPAPI_BASE_URL: &str = "https://serpapi.com";

/// Google results through SerpAPI
pub struct SerpApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    link: Option<String>,
}

impl SerpApiProvider {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: SERPAPI_BASE_URL.to_string(),
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
impl SearchProvider for SerpApiProvider {
    fn name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, DiscoveryError> {
        let endpoint = format!("{}/search", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&endpoint)
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", "10"),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(DiscoveryError::Status(response.status().as_u16()));
        }

        let body: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

        Ok(body
            .organic_results
            .into_iter()
            .filter_map(|result| result.link)
            .collect())
    }
}
