//! Company name inference from page metadata

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing title segments such as `| Home`, ` - Services`, `— About`
static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\|.*$| - .*|—.*|–.*").expect("title suffix pattern is valid"));

/// Metadata of a fetched page relevant to naming the company
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    /// Text of the `<title>` element
    pub title: Option<String>,

    /// Content of `<meta property="og:site_name">`
    pub site_name: Option<String>,
}

/// Infers a company name for a domain
///
/// Preference order:
/// 1. the page title with trailing separator segments stripped
/// 2. the `og:site_name` value
/// 3. the domain's first label, hyphens as spaces, title-cased
///
/// Each candidate must be at least two characters long. The bare domain is
/// the last resort.
///
/// # Examples
///
/// ```
/// use lead_ripple::extract::{infer_company_name, PageMetadata};
///
/// let meta = PageMetadata {
///     title: Some("Blue Water Yachting | Contact".to_string()),
///     site_name: None,
/// };
/// assert_eq!(infer_company_name(&meta, Some("bluewater.com")), "Blue Water Yachting");
///
/// let empty = PageMetadata::default();
/// assert_eq!(infer_company_name(&empty, Some("blue-water.com")), "Blue Water");
/// ```
pub fn infer_company_name(meta: &PageMetadata, domain: Option<&str>) -> String {
    let title = meta
        .title
        .as_deref()
        .map(|t| TITLE_SUFFIX.replace_all(t.trim(), "").trim().to_string())
        .unwrap_or_default();

    let site_name = meta
        .site_name
        .as_deref()
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let fallback = domain.map(name_from_domain).unwrap_or_default();

    for candidate in [&title, &site_name, &fallback] {
        if candidate.chars().count() >= 2 {
            return candidate.clone();
        }
    }

    if !fallback.is_empty() {
        fallback
    } else {
        domain.unwrap_or_default().to_string()
    }
}

/// Derives a display name from a domain's first label
///
/// `blue-water-yachts.co.uk` becomes `Blue Water Yachts`.
pub fn name_from_domain(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or_default();
    title_case(&label.replace('-', " "))
}

/// Uppercases the first letter of every word and lowercases the rest
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}
