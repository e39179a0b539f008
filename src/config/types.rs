use serde::Deserialize;

/// Main configuration structure for Lead-Ripple
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub output: OutputConfig,
}

/// What to look for and where
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Topical keywords, e.g. "yacht management company"
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Regions combined with every keyword, e.g. "Miami"
    #[serde(default)]
    pub regions: Vec<String>,

    /// Sites to crawl in addition to whatever discovery returns
    #[serde(default)]
    pub seeds: Vec<String>,

    /// Discovery stops issuing queries once this many result links are collected
    #[serde(rename = "max-results", default = "default_max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            regions: Vec::new(),
            seeds: Vec::new(),
            max_results: default_max_results(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of leads after which the run stops
    #[serde(default = "default_target")]
    pub target: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of pages visited per domain
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Link expansion continues only while fewer emails than this were collected
    #[serde(
        rename = "expansion-email-threshold",
        default = "default_expansion_email_threshold"
    )]
    pub expansion_email_threshold: usize,

    /// Maximum same-domain links taken from a single page
    #[serde(rename = "links-per-page", default = "default_links_per_page")]
    pub links_per_page: usize,

    /// Retries after the first attempt of a page fetch
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            timeout_secs: default_timeout_secs(),
            max_pages: default_max_pages(),
            expansion_email_threshold: default_expansion_email_threshold(),
            links_per_page: default_links_per_page(),
            max_retries: default_max_retries(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the identity header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Optional post-crawl filtering
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Case-insensitive pattern a lead's location must match
    #[serde(rename = "region-pattern", default)]
    pub region_pattern: Option<String>,
}

/// Search provider credentials; the first configured one is used
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersConfig {
    #[serde(rename = "serpapi-key", default)]
    pub serpapi_key: Option<String>,

    #[serde(rename = "bing-key", default)]
    pub bing_key: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown summary file
    #[serde(rename = "summary-path")]
    pub summary_path: String,

    /// Optional CSV export written after every run
    #[serde(rename = "csv-path", default)]
    pub csv_path: Option<String>,
}

fn default_max_results() -> usize {
    200
}

fn default_target() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_max_pages() -> usize {
    10
}

fn default_expansion_email_threshold() -> usize {
    2
}

fn default_links_per_page() -> usize {
    10
}

fn default_max_retries() -> u32 {
    2
}
