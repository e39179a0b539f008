//! Region filter applied to accepted leads

use regex::{Regex, RegexBuilder};

/// Case-insensitive pattern a lead's location must match
///
/// An unset, empty or malformed pattern matches every location.
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    pattern: Option<Regex>,
}

impl RegionFilter {
    pub fn new(pattern: Option<&str>) -> Self {
        let pattern = match pattern.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => match RegexBuilder::new(p).case_insensitive(true).build() {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!("Ignoring invalid region pattern {:?}: {}", p, e);
                    None
                }
            },
            None => None,
        };

        Self { pattern }
    }

    pub fn is_active(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn matches(&self, location: &str) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(location),
            None => true,
        }
    }
}
