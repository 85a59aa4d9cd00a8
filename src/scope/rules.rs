//! Individual scope predicates
//!
//! Each function answers one question about a canonical URL. The validator
//! strings them together in a fixed order.

use crate::url::matches_domain;
use regex::Regex;
use std::collections::HashSet;

/// Matches an ISO date (`2019-04-12`) standing as a whole word
pub(crate) fn date_token_regex() -> Result<Regex, regex::Error> {
    Regex::new(r"\b\d{4}-\d{2}-\d{2}\b")
}

/// Returns true if the scheme may be fetched
pub fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

/// Returns true if the host is one of the allowed domains or below one
pub fn is_allowed_host(host: Option<&str>, allowed_domains: &[String]) -> bool {
    match host {
        Some(host) if !host.is_empty() => allowed_domains
            .iter()
            .any(|domain| matches_domain(domain, host)),
        _ => false,
    }
}

/// Returns the first blacklisted marker found in the query, if any
///
/// Comparison is case-insensitive; `markers` must be lowercase.
pub fn blacklisted_query_marker<'a>(query: Option<&str>, markers: &'a [String]) -> Option<&'a str> {
    let query = query?.to_lowercase();
    markers
        .iter()
        .find(|marker| query.contains(marker.as_str()))
        .map(String::as_str)
}

/// Returns the first trap pattern found anywhere in the URL, if any
///
/// Comparison is case-insensitive; `patterns` must be lowercase.
pub fn matching_trap_pattern<'a>(url: &str, patterns: &'a [String]) -> Option<&'a str> {
    let url = url.to_lowercase();
    patterns
        .iter()
        .find(|pattern| url.contains(pattern.as_str()))
        .map(String::as_str)
}

/// Extracts the lowercase extension of the last path segment
///
/// ```
/// use link_sieve::scope::path_extension;
///
/// assert_eq!(path_extension("/pubs/paper.PDF"), Some("pdf".to_string()));
/// assert_eq!(path_extension("/dist/pkg.tar.gz"), Some("gz".to_string()));
/// assert_eq!(path_extension("/v1.2/readme"), None);
/// assert_eq!(path_extension("/people"), None);
/// ```
pub fn path_extension(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next()?;
    let (_, extension) = last_segment.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}

/// Returns true if the path's extension is blacklisted
pub fn has_disallowed_extension(path: &str, extensions: &HashSet<String>) -> bool {
    path_extension(path)
        .map(|extension| extensions.contains(&extension))
        .unwrap_or(false)
}
