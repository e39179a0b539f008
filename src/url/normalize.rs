use crate::{UrlError, UrlResult};
use url::Url;

/// Derives the canonical `{scheme}://{host}/` root of a URL
///
/// The root keeps an explicit port, since two services on one host
/// are different sites. Path, query and fragment are dropped.
///
/// # Arguments
///
/// * `url_str` - Any absolute HTTP(S) URL
///
/// # Returns
///
/// * `Ok(String)` - The root with a trailing slash
/// * `Err(UrlError)` - The URL does not parse, is not HTTP(S) or has no host
///
/// # Examples
///
/// ```
/// use lead_ripple::url::root_of;
///
/// assert_eq!(root_of("https://Acme.com/contact?x=1#top").unwrap(), "https://acme.com/");
/// assert_eq!(root_of("http://127.0.0.1:8080/a/b").unwrap(), "http://127.0.0.1:8080/");
/// ```
pub fn root_of(url_str: &str) -> UrlResult<String> {
    let url = parse_http_url(url_str)?;
    let host = url.host_str().ok_or(UrlError::MissingDomain)?;

    Ok(match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    })
}

/// Parses a URL and rejects anything that is not HTTP(S)
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns the path and query of a URL in robots.txt matching form
pub fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
