use url::{Host, Url};

/// Extracts the registrable domain (public suffix plus one label) of a URL
///
/// Hosts are lowercased and any `www.`-style subdomains collapse onto the
/// registrable domain, so `https://www.acme.co.uk/contact` and
/// `http://shop.acme.co.uk/` both normalize to `acme.co.uk`.
///
/// IP addresses and single-label hosts such as `localhost` have no public
/// suffix and normalize to themselves. A host that is itself a public suffix
/// (`co.uk`) has no domain label and yields `None`.
///
/// # Examples
///
/// ```
/// use lead_ripple::url::normalize_domain;
///
/// assert_eq!(normalize_domain("https://www.Acme.com/about"), Some("acme.com".to_string()));
/// assert_eq!(normalize_domain("https://shop.acme.co.uk/"), Some("acme.co.uk".to_string()));
/// assert_eq!(normalize_domain("not a url"), None);
/// ```
pub fn normalize_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    match parsed.host()? {
        Host::Ipv4(ip) => Some(ip.to_string()),
        Host::Ipv6(ip) => Some(ip.to_string()),
        Host::Domain(host) => registrable_domain(host),
    }
}

/// Returns true if both URLs normalize to the same registrable domain
pub fn same_domain(a: &str, b: &str) -> bool {
    match (normalize_domain(a), normalize_domain(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn registrable_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.').to_lowercase();
    if host.is_empty() {
        return None;
    }

    if !host.contains('.') {
        return Some(host);
    }

    if psl::suffix_str(&host) == Some(host.as_str()) {
        return None;
    }

    match psl::domain_str(&host) {
        Some(domain) => Some(domain.to_string()),
        None => last_two_labels(&host),
    }
}

fn last_two_labels(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    match labels.len() {
        0 => None,
        1 => Some(labels[0].to_string()),
        n => Some(format!("{}.{}", labels[n - 2], labels[n - 1])),
    }
}
