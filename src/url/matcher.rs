/// Checks if a host belongs to an allowed domain
///
/// A host matches when it equals the domain or is a subdomain of it at any
/// depth. The comparison is label-aligned, so `notics.uci.edu` does not match
/// `ics.uci.edu`. A leading `*.` on the domain is accepted and means the same
/// thing. A trailing dot on the host (fully-qualified form) is ignored.
///
/// Both arguments are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use link_sieve::url::matches_domain;
///
/// assert!(matches_domain("ics.uci.edu", "ics.uci.edu"));
/// assert!(matches_domain("ics.uci.edu", "vision.ics.uci.edu"));
/// assert!(matches_domain("*.ics.uci.edu", "a.b.ics.uci.edu"));
/// assert!(!matches_domain("ics.uci.edu", "notics.uci.edu"));
/// assert!(!matches_domain("ics.uci.edu", "ics.uci.edu.evil.com"));
/// ```
pub fn matches_domain(domain: &str, host: &str) -> bool {
    let domain = domain.strip_prefix("*.").unwrap_or(domain);
    let host = host.strip_suffix('.').unwrap_or(host);

    if domain.is_empty() || host.is_empty() {
        return false;
    }

    match host.strip_suffix(domain) {
        Some("") => true,
        Some(prefix) => prefix.ends_with('.'),
        None => false,
    }
}
