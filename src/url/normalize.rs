use crate::url::domain::strip_www;
use crate::url::CanonicalUrl;
use crate::UrlError;
use url::Url;

/// Canonicalizes a link found on a page
///
/// # Canonicalization Steps
///
/// 1. Parse the base URL and resolve `href` against it (relative,
///    protocol-relative and absolute forms); reject if either is malformed
/// 2. Remove the fragment (everything after #)
/// 3. Decode `%7E` to `~`; every other escape is left as-is
/// 4. Lowercase the scheme and host, then strip leading `www.` labels and
///    the trailing root dot
/// 5. Collapse the path:
///    - Drop empty segments (repeated and trailing slashes)
///    - Drop a segment equal to the segment kept just before it
///    - Empty path becomes /
/// 6. Keep the query string exactly as written
///
/// Step 5 is a heuristic against path doubling from repeated relative joins
/// (`/foo/foo/bar` becomes `/foo/bar`). It also collapses legitimately
/// repeated segments.
///
/// # Arguments
///
/// * `base` - The URL of the page the link was found on
/// * `href` - The raw `href` attribute value
///
/// # Returns
///
/// * `Ok(CanonicalUrl)` - The canonical absolute URL
/// * `Err(UrlError)` - The base or the link could not be parsed
///
/// # Examples
///
/// ```
/// use link_sieve::url::canonicalize;
///
/// let url = canonicalize("https://www.ics.uci.edu/people/", "../%7Eeppstein/pix/#top").unwrap();
/// assert_eq!(url.as_str(), "https://ics.uci.edu/~eppstein/pix");
/// ```
pub fn canonicalize(base: &str, href: &str) -> Result<CanonicalUrl, UrlError> {
    let base = Url::parse(base.trim())
        .map_err(|e| UrlError::Parse(format!("base '{}': {}", base, e)))?;
    canonicalize_against(&base, href)
}

/// Canonicalizes `href` against an already-parsed base URL
pub(crate) fn canonicalize_against(base: &Url, href: &str) -> Result<CanonicalUrl, UrlError> {
    let joined = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("'{}': {}", href, e)))?;

    let mut url = decode_tilde(joined)?;
    url.set_fragment(None);

    normalize_host(&mut url)?;

    if !url.cannot_be_a_base() {
        let path = collapse_path(url.path());
        url.set_path(&path);
    }

    Ok(CanonicalUrl::from_normalized(url))
}

/// Rewrites every `%7E`/`%7e` escape to a literal tilde
fn decode_tilde(url: Url) -> Result<Url, UrlError> {
    let raw = url.as_str();
    if !raw.contains("%7E") && !raw.contains("%7e") {
        return Ok(url);
    }

    let decoded = raw.replace("%7E", "~").replace("%7e", "~");
    Url::parse(&decoded).map_err(|e| UrlError::Malformed(format!("'{}': {}", decoded, e)))
}

/// Lowercases the host, drops a trailing root dot and strips leading `www.` labels
fn normalize_host(url: &mut Url) -> Result<(), UrlError> {
    let Some(host) = url.host_str() else {
        return Ok(());
    };

    let lowered = host.to_lowercase();
    let normalized = strip_www(lowered.trim_end_matches('.'));

    if normalized != host {
        let normalized = normalized.to_string();
        url.set_host(Some(&normalized))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    }

    Ok(())
}

/// Drops empty segments and segments that repeat their predecessor
fn collapse_path(path: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        if segment.is_empty() || kept.last() == Some(&segment) {
            continue;
        }
        kept.push(segment);
    }

    format!("/{}", kept.join("/"))
}
