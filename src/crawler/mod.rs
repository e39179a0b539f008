//! Crawler module for lead harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry and backoff
//! - HTML parsing and link extraction
//! - Politeness pauses behind an injectable clock
//! - Bounded per-domain crawling
//! - Overall run coordination

mod coordinator;
mod domain;
mod fetcher;
mod filter;
mod parser;
mod throttle;

pub use coordinator::{Coordinator, HarvestReport, HarvestRequest};
pub use domain::{CrawlSession, CrawlSettings, CONTACT_PATHS};
pub use fetcher::{build_http_client, AttemptFailure, FetchOutcome, HttpFetcher, RetryPolicy};
pub use filter::RegionFilter;
pub use parser::{parse_html, same_domain_links, ParsedPage};
pub use throttle::{Pause, RecordingSleeper, Sleeper, Throttle, TokioSleeper};
