//! State module for leads and per-domain crawl progress
//!
//! # Components
//!
//! - `Lead`: the contact record produced once per domain
//! - `CrawlState`: frontier, visited set and collected contacts of one domain crawl
//! - `DomainOutcome`: accepted lead or the reason a candidate was skipped

mod crawl_state;
mod lead;
mod outcome;

pub use crawl_state::{CrawlState, FALLBACK_LOCAL_PARTS};
pub use lead::Lead;
pub use outcome::{DomainOutcome, SkipReason};
