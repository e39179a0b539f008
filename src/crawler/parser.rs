//! HTML parser for extracting links and naming metadata
//!
//! This module handles parsing HTML content to extract:
//! - Anchor links to follow within the same domain
//! - Page title and `og:site_name` for company-name inference

use crate::extract::PageMetadata;
use crate::url::same_domain;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Title and site name
    pub metadata: PageMetadata,

    /// All anchor links found on the page (absolute URLs, in document order)
    pub links: Vec<String>,
}

/// Parses HTML content and extracts anchor links and metadata
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document
///
/// **Exclude:**
/// - fragment-only links (`#section`)
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - anything that does not resolve to HTTP(S)
///
/// # Example
///
/// ```
/// use lead_ripple::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.metadata.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let metadata = PageMetadata {
        title: extract_title(&document),
        site_name: extract_site_name(&document),
    };

    ParsedPage {
        metadata,
        links: extract_links(&document, base_url),
    }
}

/// Keeps up to `limit` distinct links on the same registrable domain as `base`
///
/// # Arguments
///
/// * `links` - Absolute links in document order
/// * `base` - Root of the site being crawled
/// * `limit` - Maximum number of links returned
///
/// # Returns
///
/// The first `limit` distinct same-domain links, in document order
pub fn same_domain_links(links: &[String], base: &str, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter(|link| same_domain(link, base))
        .filter(|link| seen.insert(link.as_str()))
        .take(limit)
        .cloned()
        .collect()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_site_name(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:site_name"]"#).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .find(|s| !s.is_empty())
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
