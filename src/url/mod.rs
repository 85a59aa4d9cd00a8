//! URL handling module for Link-Sieve
//!
//! This module provides link canonicalization, host extraction and
//! domain matching.

mod domain;
mod matcher;
mod normalize;

use std::fmt;
use url::Url;

// Re-export main functions
pub use domain::{extract_host, strip_www};
pub use matcher::matches_domain;
pub use normalize::canonicalize;

/// A normalized absolute URL
///
/// Instances only come out of [`canonicalize`] (or [`CanonicalUrl::parse`]),
/// so they never carry a fragment, a `%7E` escape, an uppercase host, a
/// leading `www.` label, empty path segments or two adjacent identical path
/// segments. The string form is also the ledger identity key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub(crate) fn from_normalized(url: Url) -> Self {
        Self(url)
    }

    /// Canonicalizes an absolute URL string
    ///
    /// ```
    /// use link_sieve::url::CanonicalUrl;
    ///
    /// let url = CanonicalUrl::parse("https://www.ics.uci.edu/~eppstein/pix/").unwrap();
    /// assert_eq!(url.as_str(), "https://ics.uci.edu/~eppstein/pix");
    /// ```
    pub fn parse(input: &str) -> crate::UrlResult<Self> {
        let url = Url::parse(input.trim()).map_err(|e| crate::UrlError::Parse(e.to_string()))?;
        normalize::canonicalize_against(&url, "")
    }

    /// Resolves a link found on this page and canonicalizes it
    pub fn join(&self, href: &str) -> crate::UrlResult<Self> {
        normalize::canonicalize_against(&self.0, href)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.0.query()
    }

    pub fn into_string(self) -> String {
        self.0.into()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
