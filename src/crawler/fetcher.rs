//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client with the crawler's identity string
//! - GET requests with redirects followed
//! - Retry with backoff for throttling, error statuses and transport failures
//!
//! Failures never propagate as errors: after the last retry the caller gets
//! [`FetchOutcome::Unavailable`] and moves on.

use crate::config::UserAgentConfig;
use crate::crawler::throttle::Sleeper;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A 2xx response was received
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Every attempt failed
    Unavailable {
        /// Number of attempts made
        attempts: u32,
        /// Description of the last failure
        error: String,
    },
}

/// Why a single attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// HTTP 403 or 429
    Throttled(u16),
    /// Any other non-2xx status
    Status(u16),
    /// Timeout, connection or DNS failure, or an unreadable body
    Transport(String),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Throttled(code) => write!(f, "HTTP {} (throttled)", code),
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Transport(error) => write!(f, "{}", error),
        }
    }
}

/// Retry and backoff policy
///
/// | Failure | Pause before the next attempt |
/// |---------|-------------------------------|
/// | HTTP 403 / 429 | `throttled_step × attempt number` |
/// | Other non-2xx | `status_pause` |
/// | Transport error | `transport_pause + transport_step × retries so far` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub throttled_step: Duration,
    pub status_pause: Duration,
    pub transport_pause: Duration,
    pub transport_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            throttled_step: Duration::from_secs(2),
            status_pause: Duration::from_millis(600),
            transport_pause: Duration::from_millis(600),
            transport_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Pause after the failed attempt with zero-based index `attempt`
    pub fn delay(&self, failure: &AttemptFailure, attempt: u32) -> Duration {
        match failure {
            AttemptFailure::Throttled(_) => self.throttled_step * (attempt + 1),
            AttemptFailure::Status(_) => self.status_pause,
            AttemptFailure::Transport(_) => self.transport_pause + self.transport_step * attempt,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The identity header has the form `Name/Version (+ContactURL; ContactEmail)`.
/// Redirects are followed up to ten hops.
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrying GET client shared by the whole run
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl HttpFetcher {
    pub fn new(client: Client, policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            client,
            policy,
            sleeper,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn sleeper(&self) -> &Arc<dyn Sleeper> {
        &self.sleeper
    }

    /// Fetches a URL, retrying per the policy
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `timeout` - Timeout of each attempt
    ///
    /// # Returns
    ///
    /// * `FetchOutcome::Success` - A 2xx response, possibly after redirects
    /// * `FetchOutcome::Unavailable` - Every attempt failed
    pub async fn fetch(&self, url: &str, timeout: Duration) -> FetchOutcome {
        let attempts = self.policy.max_retries + 1;
        let mut last_failure = AttemptFailure::Transport("no attempt made".to_string());

        for attempt in 0..attempts {
            match self.attempt(url, timeout).await {
                Ok(outcome) => return outcome,
                Err(failure) => {
                    tracing::debug!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt + 1,
                        attempts,
                        url,
                        failure
                    );
                    if attempt + 1 < attempts {
                        self.sleeper.sleep(self.policy.delay(&failure, attempt)).await;
                    }
                    last_failure = failure;
                }
            }
        }

        tracing::debug!("Giving up on {} after {} attempts", url, attempts);
        FetchOutcome::Unavailable {
            attempts,
            error: last_failure.to_string(),
        }
    }

    /// Fetches a URL exactly once, without retries or pauses
    pub async fn fetch_once(&self, url: &str, timeout: Duration) -> FetchOutcome {
        match self.attempt(url, timeout).await {
            Ok(outcome) => outcome,
            Err(failure) => FetchOutcome::Unavailable {
                attempts: 1,
                error: failure.to_string(),
            },
        }
    }

    async fn attempt(&self, url: &str, timeout: Duration) -> Result<FetchOutcome, AttemptFailure> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| AttemptFailure::Transport(classify_transport_error(&e)))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptFailure::Throttled(status.as_u16()));
        }
        if !status.is_success() {
            return Err(AttemptFailure::Status(status.as_u16()));
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| AttemptFailure::Transport(format!("Failed to read body: {}", e)))?;

        Ok(FetchOutcome::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

fn classify_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection failed".to_string()
    } else if e.is_redirect() {
        "Too many redirects".to_string()
    } else {
        e.to_string()
    }
}
