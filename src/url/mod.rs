//! URL handling module for Lead-Ripple
//!
//! This module provides registrable-domain normalization, same-domain checks,
//! root URL derivation, and candidate deduplication.

mod domain;
mod normalize;

pub use domain::{normalize_domain, same_domain};
pub use normalize::{parse_http_url, path_and_query, root_of};

use std::collections::BTreeMap;

/// A candidate site root together with its normalized domain
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredRoot {
    /// Canonical `scheme://host/` form, the crawl seed
    pub root: String,

    /// Registrable domain used for lead deduplication
    pub domain: String,
}

/// Reduces candidate URLs to distinct crawlable roots
///
/// URLs that fail to parse or whose domain does not normalize are dropped.
/// The result is ordered lexicographically by root so repeated runs with the
/// same candidates crawl in the same order.
///
/// # Examples
///
/// ```
/// use lead_ripple::url::reduce_to_roots;
///
/// let roots = reduce_to_roots(vec![
///     "https://b.com/x".to_string(),
///     "https://a.com/contact".to_string(),
///     "https://a.com/about".to_string(),
/// ]);
/// assert_eq!(roots.len(), 2);
/// assert_eq!(roots[0].root, "https://a.com/");
/// ```
pub fn reduce_to_roots<I>(candidates: I) -> Vec<DiscoveredRoot>
where
    I: IntoIterator<Item = String>,
{
    let mut roots = BTreeMap::new();

    for candidate in candidates {
        let root = match root_of(&candidate) {
            Ok(root) => root,
            Err(e) => {
                tracing::debug!("Dropping candidate {}: {}", candidate, e);
                continue;
            }
        };

        match normalize_domain(&root) {
            Some(domain) => {
                roots.entry(root.clone()).or_insert(DiscoveredRoot { root, domain });
            }
            None => tracing::debug!("Dropping candidate {}: no registrable domain", candidate),
        }
    }

    roots.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_dedups_same_root() {
        let roots = reduce_to_roots(vec![
            "https://acme.com/about".to_string(),
            "https://acme.com/contact".to_string(),
            "https://acme.com/".to_string(),
        ]);
        assert_eq!(
            roots,
            vec![DiscoveredRoot {
                root: "https://acme.com/".to_string(),
                domain: "acme.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_reduce_keeps_distinct_hosts_of_one_domain() {
        let roots = reduce_to_roots(vec![
            "https://www.acme.com/".to_string(),
            "https://acme.com/".to_string(),
        ]);
        assert_eq!(roots.len(), 2);
        assert!(roots.iter().all(|r| r.domain == "acme.com"));
    }

    #[test]
    fn test_reduce_drops_unnormalizable() {
        let roots = reduce_to_roots(vec![
            "garbage".to_string(),
            "mailto:x@acme.com".to_string(),
            "https://co.uk/".to_string(),
            "https://zeta.io/".to_string(),
        ]);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].domain, "zeta.io");
    }

    #[test]
    fn test_reduce_orders_lexicographically() {
        let roots = reduce_to_roots(vec![
            "https://zeta.io/".to_string(),
            "https://alpha.io/".to_string(),
            "http://mid.io/".to_string(),
        ]);
        let order: Vec<_> = roots.iter().map(|r| r.root.as_str()).collect();
        assert_eq!(
            order,
            vec!["http://mid.io/", "https://alpha.io/", "https://zeta.io/"]
        );
    }
}
