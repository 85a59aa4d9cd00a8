//! Scope validation for discovered links
//!
//! Decides whether a canonical URL may be handed to the frontier. Rules run in
//! a fixed order and the first failing rule decides:
//!
//! 1. Scheme is `http` or `https`
//! 2. Host is an allowed domain or one of its subdomains
//! 3. Path carries no ISO date token (calendar permalinks)
//! 4. Query carries no calendar/export marker
//! 5. URL contains no configured trap substring
//! 6. Path extension is not a binary/document/media format

mod rules;

pub use rules::{
    blacklisted_query_marker, has_disallowed_extension, is_allowed_host, is_http_scheme,
    matching_trap_pattern, path_extension,
};

use crate::config::ScopeConfig;
use crate::url::CanonicalUrl;
use crate::ConfigError;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// Why a URL was kept out of the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Scheme other than http/https
    Scheme,
    /// Host outside the allowed domains
    OutOfDomain,
    /// Path contains a date token
    DatePattern,
    /// Query contains a blacklisted marker
    QueryBlacklist,
    /// URL contains a known trap substring
    TrapPattern,
    /// Path ends in a blacklisted file extension
    DisallowedExtension,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheme => "scheme",
            Self::OutOfDomain => "out_of_domain",
            Self::DatePattern => "date_pattern",
            Self::QueryBlacklist => "query_blacklist",
            Self::TrapPattern => "trap_pattern",
            Self::DisallowedExtension => "disallowed_extension",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a scope check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeDecision {
    Accept,
    Reject(RejectReason),
}

impl ScopeDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Self::Accept => None,
            Self::Reject(reason) => Some(*reason),
        }
    }
}

/// Compiled scope rules
///
/// Built once per crawl from [`ScopeConfig`] and shared by every worker;
/// checking a URL has no side effects beyond debug logging.
#[derive(Debug, Clone)]
pub struct ScopeValidator {
    allowed_domains: Vec<String>,
    query_blacklist: Vec<String>,
    trap_patterns: Vec<String>,
    disallowed_extensions: HashSet<String>,
    date_token: Regex,
}

impl ScopeValidator {
    /// Compiles the scope rules from configuration
    ///
    /// Markers and patterns are lowercased; extensions lose a leading dot.
    pub fn new(config: &ScopeConfig) -> Result<Self, ConfigError> {
        let date_token = rules::date_token_regex()
            .map_err(|e| ConfigError::InvalidPattern(format!("date token: {}", e)))?;

        Ok(Self {
            allowed_domains: lowercase_all(&config.allowed_domains),
            query_blacklist: lowercase_all(&config.query_blacklist),
            trap_patterns: lowercase_all(&config.trap_patterns),
            disallowed_extensions: config
                .disallowed_extensions
                .iter()
                .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
                .collect(),
            date_token,
        })
    }

    /// Runs every rule in order and reports the first failure
    pub fn check(&self, url: &CanonicalUrl) -> ScopeDecision {
        let decision = self.evaluate(url);
        if let ScopeDecision::Reject(reason) = decision {
            tracing::debug!("Rejected {} ({})", url, reason);
        }
        decision
    }

    /// Returns true if the URL passes all six rules
    pub fn is_in_scope(&self, url: &CanonicalUrl) -> bool {
        self.check(url).is_accepted()
    }

    fn evaluate(&self, url: &CanonicalUrl) -> ScopeDecision {
        if !is_http_scheme(url.scheme()) {
            return ScopeDecision::Reject(RejectReason::Scheme);
        }

        if !is_allowed_host(url.host(), &self.allowed_domains) {
            return ScopeDecision::Reject(RejectReason::OutOfDomain);
        }

        if self.date_token.is_match(url.path()) {
            return ScopeDecision::Reject(RejectReason::DatePattern);
        }

        if let Some(marker) = blacklisted_query_marker(url.query(), &self.query_blacklist) {
            tracing::trace!("Query marker '{}' in {}", marker, url);
            return ScopeDecision::Reject(RejectReason::QueryBlacklist);
        }

        if let Some(pattern) = matching_trap_pattern(url.as_str(), &self.trap_patterns) {
            tracing::trace!("Trap pattern '{}' in {}", pattern, url);
            return ScopeDecision::Reject(RejectReason::TrapPattern);
        }

        if has_disallowed_extension(url.path(), &self.disallowed_extensions) {
            return ScopeDecision::Reject(RejectReason::DisallowedExtension);
        }

        ScopeDecision::Accept
    }
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}
