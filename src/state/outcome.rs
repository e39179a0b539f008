use crate::state::Lead;
use std::fmt;

/// Why a candidate domain produced no lead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The candidate URL has no registrable domain
    Unnormalizable,

    /// A lead for this domain was already accepted in this run
    AlreadyProduced,

    /// The lead's location did not match the region filter
    RegionMismatch,

    /// The crawl produced a lead without name or website
    MissingIdentity,

    /// The crawl failed outright
    CrawlFailed(String),

    /// The run was cancelled while this domain was in flight
    Cancelled,
}

impl SkipReason {
    /// Stable label used for statistics and storage
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unnormalizable => "unnormalizable",
            Self::AlreadyProduced => "already_produced",
            Self::RegionMismatch => "region_mismatch",
            Self::MissingIdentity => "missing_identity",
            Self::CrawlFailed(_) => "crawl_failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CrawlFailed(message) => write!(f, "crawl_failed: {}", message),
            other => f.write_str(other.label()),
        }
    }
}

/// Result of processing one candidate domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainOutcome {
    Accepted(Lead),
    Skipped(SkipReason),
}

impl DomainOutcome {
    pub fn lead(&self) -> Option<&Lead> {
        match self {
            Self::Accepted(lead) => Some(lead),
            Self::Skipped(_) => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Accepted(_) => None,
            Self::Skipped(reason) => Some(reason),
        }
    }
}
