use crate::extract::{name_from_domain, normalize_phone, ContactSet};
use crate::state::Lead;
use std::collections::{BTreeSet, HashSet, VecDeque};

/// Local parts used to synthesize plausible addresses when a site
/// exposes no email at all
pub const FALLBACK_LOCAL_PARTS: [&str; 5] = ["info", "contact", "hello", "sales", "office"];

/// Transient state of one domain crawl
///
/// Owned exclusively by a single crawl invocation and consumed by
/// [`CrawlState::into_lead`] once the frontier is exhausted or the page
/// ceiling is reached.
#[derive(Debug)]
pub struct CrawlState {
    start_url: String,
    root: String,
    domain: Option<String>,
    visited: HashSet<String>,
    frontier: VecDeque<String>,
    contacts: ContactSet,
    source_pages: BTreeSet<String>,
    company_name: Option<String>,
}

impl CrawlState {
    /// Creates the state for a crawl seeded with the start URL followed by `seeds`
    pub fn new<I>(start_url: &str, root: &str, domain: Option<String>, seeds: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut frontier = VecDeque::new();
        frontier.push_back(start_url.to_string());
        frontier.extend(seeds);

        Self {
            start_url: start_url.to_string(),
            root: root.to_string(),
            domain,
            visited: HashSet::new(),
            frontier,
            contacts: ContactSet::default(),
            source_pages: BTreeSet::new(),
            company_name: None,
        }
    }

    /// Pops the next unvisited URL in FIFO order and marks it visited
    ///
    /// Returns `None` once the frontier is empty or `max_pages` URLs have
    /// been visited.
    pub fn next_url(&mut self, max_pages: usize) -> Option<String> {
        while self.visited.len() < max_pages {
            let url = self.frontier.pop_front()?;
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn email_count(&self) -> usize {
        self.contacts.emails.len()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn needs_company_name(&self) -> bool {
        self.company_name.is_none()
    }

    pub fn set_company_name(&mut self, name: String) {
        if !name.is_empty() {
            self.company_name = Some(name);
        }
    }

    /// Merges contacts found on `url`; the page counts as a source only
    /// when it contributed something
    pub fn record_contacts(&mut self, url: &str, found: ContactSet) -> bool {
        if found.is_empty() {
            return false;
        }
        self.contacts.merge(found);
        self.source_pages.insert(url.to_string());
        true
    }

    /// Whether links from the current page should be followed
    pub fn should_expand(&self, email_threshold: usize, max_pages: usize) -> bool {
        self.email_count() < email_threshold && self.visited.len() < max_pages
    }

    /// Queues a discovered link unless it was visited or the frontier is full
    pub fn enqueue(&mut self, url: String, max_pages: usize) -> bool {
        if self.visited.contains(&url) || self.frontier.len() >= max_pages {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    /// Finalizes the crawl into a lead
    ///
    /// With no collected email, the fixed fallback addresses at the domain
    /// are used. Phone is the candidate with the shortest digit form, email
    /// the lexicographically first address.
    pub fn into_lead(mut self) -> Lead {
        if self.contacts.emails.is_empty() {
            if let Some(domain) = &self.domain {
                for local in FALLBACK_LOCAL_PARTS {
                    self.contacts.emails.insert(format!("{}@{}", local, domain));
                }
            }
        }

        let phone = self
            .contacts
            .phones
            .iter()
            .min_by_key(|p| normalize_phone(p).len())
            .cloned()
            .unwrap_or_default();

        let email = self.contacts.emails.iter().next().cloned().unwrap_or_default();
        let location = self
            .contacts
            .locations
            .iter()
            .next()
            .cloned()
            .unwrap_or_default();

        let source_page = self
            .source_pages
            .iter()
            .next()
            .cloned()
            .unwrap_or(self.start_url);

        let name = match self.company_name {
            Some(name) => name,
            None => self.domain.as_deref().map(name_from_domain).unwrap_or_default(),
        };

        Lead {
            name,
            website: self.root.trim_end_matches('/').to_string(),
            phone,
            email,
            location,
            source_page,
        }
    }
}
