//! Fetch results handed over by the scheduler
//!
//! The scheduler owns HTTP. It reports each fetch as a requested URL, a status
//! code, an optional redirect target and an optional body; this module folds
//! that into the three cases the pipeline cares about.

/// Classified result of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// 2xx with a non-blank body
    Success {
        /// Raw response body
        body: Vec<u8>,
    },

    /// 3xx with a known target
    Redirect {
        /// Where the server sent us
        target: String,
    },

    /// Anything else: 4xx/5xx, blank body, redirect without target
    Failure,
}

/// A single fetch as reported by the scheduler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The URL the scheduler asked for
    pub requested_url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Classified status
    pub status: FetchStatus,
}

impl FetchOutcome {
    /// Classifies a raw scheduler report
    ///
    /// # Arguments
    ///
    /// * `requested_url` - The URL that was fetched
    /// * `status_code` - HTTP status code
    /// * `redirect_target` - Final URL for redirects, if the fetcher knows it
    /// * `body` - Response body, if any
    ///
    /// # Example
    ///
    /// ```
    /// use link_sieve::crawler::{FetchOutcome, FetchStatus};
    ///
    /// let outcome = FetchOutcome::new("https://ics.uci.edu/", 200, None, Some(b"   ".to_vec()));
    /// assert_eq!(outcome.status, FetchStatus::Failure);
    /// ```
    pub fn new(
        requested_url: impl Into<String>,
        status_code: u16,
        redirect_target: Option<String>,
        body: Option<Vec<u8>>,
    ) -> Self {
        let status = match status_code {
            200..=299 => match body {
                Some(body) if !is_blank(&body) => FetchStatus::Success { body },
                _ => FetchStatus::Failure,
            },
            300..=399 => match redirect_target {
                Some(target) if !target.trim().is_empty() => FetchStatus::Redirect { target },
                _ => FetchStatus::Failure,
            },
            _ => FetchStatus::Failure,
        };

        Self {
            requested_url: requested_url.into(),
            status_code,
            status,
        }
    }

    /// Shorthand for a 200 response with a body
    pub fn success(requested_url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(requested_url, 200, None, Some(body.into()))
    }

    /// Shorthand for a 301 response
    pub fn redirect(requested_url: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(requested_url, 301, Some(target.into()), None)
    }

    /// Shorthand for a failed fetch
    pub fn failure(requested_url: impl Into<String>, status_code: u16) -> Self {
        Self::new(requested_url, status_code, None, None)
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(|b| b.is_ascii_whitespace())
}
