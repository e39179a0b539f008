//! Heuristic extraction of emails, phones and address snippets from raw page text

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").expect("email pattern is valid")
});

static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\-\s().]{6,}\d").expect("phone pattern is valid"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Keywords that usually precede a postal address
pub const ADDRESS_HINTS: [&str; 5] = ["address", "location", "head office", "headquarters", "hq"];

static ADDRESS_HINT_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    ADDRESS_HINTS
        .iter()
        .map(|hint| {
            RegexBuilder::new(&regex::escape(hint))
                .case_insensitive(true)
                .build()
                .expect("escaped hint is a valid pattern")
        })
        .collect()
});

const SNIPPET_CHARS_BEFORE: usize = 120;
const SNIPPET_CHARS_AFTER: usize = 240;
const MIN_SNIPPET_LEN: usize = 10;
const MAX_SNIPPET_LEN: usize = 400;

/// Contact signals found on one or more pages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSet {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

impl ContactSet {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.locations.is_empty()
    }

    pub fn merge(&mut self, other: ContactSet) {
        self.emails.extend(other.emails);
        self.phones.extend(other.phones);
        self.locations.extend(other.locations);
    }
}

/// Extracts contact signals from raw page content
///
/// - Emails are lowercased.
/// - Phones are whitespace-normalized but otherwise kept as written.
/// - For every address hint, the first case-insensitive occurrence yields a
///   snippet from 120 characters before to 240 characters after it, kept
///   only if its normalized length is within 10..=400 characters.
///
/// # Examples
///
/// ```
/// use lead_ripple::extract::extract_contacts;
///
/// let found = extract_contacts("Write to Sales@Acme.com or call +1 (555) 123-4567");
/// assert!(found.emails.contains("sales@acme.com"));
/// assert!(found.phones.contains("+1 (555) 123-4567"));
/// ```
pub fn extract_contacts(content: &str) -> ContactSet {
    let emails = EMAIL_REGEX
        .find_iter(content)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let phones = PHONE_REGEX
        .find_iter(content)
        .map(|m| clean_text(m.as_str()))
        .collect();

    let locations = ADDRESS_HINT_REGEXES
        .iter()
        .filter_map(|hint| hint.find(content))
        .filter_map(|m| location_snippet(content, m.start()))
        .collect();

    ContactSet {
        emails,
        phones,
        locations,
    }
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn clean_text(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Keeps only digits and `+`, the comparable form of a phone number
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

fn location_snippet(content: &str, hint_start: usize) -> Option<String> {
    let before = &content[..hint_start];
    let after = &content[hint_start..];

    let start = before
        .char_indices()
        .rev()
        .take(SNIPPET_CHARS_BEFORE)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(hint_start);

    let end = after
        .char_indices()
        .nth(SNIPPET_CHARS_AFTER)
        .map(|(i, _)| hint_start + i)
        .unwrap_or(content.len());

    let snippet = clean_text(&content[start..end]);
    let len = snippet.chars().count();
    (MIN_SNIPPET_LEN..=MAX_SNIPPET_LEN)
        .contains(&len)
        .then_some(snippet)
}
