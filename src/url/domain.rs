use url::Url;

/// Extracts the host from a URL
///
/// The host is lowercased. URLs without a host (such as `mailto:` links)
/// yield `None`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use link_sieve::url::extract_host;
///
/// let url = Url::parse("https://Vision.ICS.uci.edu/papers").unwrap();
/// assert_eq!(extract_host(&url), Some("vision.ics.uci.edu".to_string()));
///
/// let url = Url::parse("mailto:someone@uci.edu").unwrap();
/// assert_eq!(extract_host(&url), None);
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Strips leading `www.` labels from a host
///
/// Every leading `www.` label is removed so the result is stable when applied
/// twice. A bare `www.` with nothing after it is left untouched.
///
/// # Examples
///
/// ```
/// use link_sieve::url::strip_www;
///
/// assert_eq!(strip_www("www.ics.uci.edu"), "ics.uci.edu");
/// assert_eq!(strip_www("ics.uci.edu"), "ics.uci.edu");
/// assert_eq!(strip_www("wwwics.uci.edu"), "wwwics.uci.edu");
/// ```
pub fn strip_www(host: &str) -> &str {
    let mut stripped = host;
    while let Some(rest) = stripped.strip_prefix("www.") {
        if rest.is_empty() {
            break;
        }
        stripped = rest;
    }
    stripped
}
