//! Per-page pipeline
//!
//! One call to [`PageProcessor::process`] handles one fetch reported by the
//! scheduler: claim the URL in the ledger, extract candidates, hand mined
//! pages to the reporting sink, then mark the URL as seen. The processor is
//! `Sync`; workers share one instance behind an `Arc`.

use crate::config::Config;
use crate::crawler::extractor::{Disposition, LinkExtractor};
use crate::crawler::filter::PageFilter;
use crate::crawler::outcome::{FetchOutcome, FetchStatus};
use crate::crawler::parser::ParsedPage;
use crate::scope::ScopeValidator;
use crate::storage::Ledger;
use crate::url::CanonicalUrl;
use crate::SieveError;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Receives every page that passes the page filter
///
/// Sinks are reporting instrumentation. Nothing they do feeds back into scope
/// or dedup decisions, but an error from a sink fails the page so it can be
/// retried. A page that failed after its sink ran is recorded again on retry,
/// so sinks must be idempotent per URL.
pub trait PageSink: Send + Sync {
    fn record(&self, url: &CanonicalUrl, page: &ParsedPage) -> Result<(), SieveError>;
}

/// How the processor handled a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Requested URL could not be canonicalized; nothing recorded
    InvalidUrl,

    /// Already visited, or another worker holds the claim
    AlreadySeen,

    /// Processed and marked as seen
    Processed(Disposition),
}

/// Output handed back to the scheduler for one page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Canonical form of the requested URL
    pub url: Option<CanonicalUrl>,

    pub status: PageStatus,

    /// Candidates for the frontier
    pub links: BTreeSet<CanonicalUrl>,

    /// Page title, when the page was mined
    pub title: Option<String>,
}

impl PageResult {
    fn without_links(url: Option<CanonicalUrl>, status: PageStatus) -> Self {
        Self {
            url,
            status,
            links: BTreeSet::new(),
            title: None,
        }
    }

    /// Returns true if the page was not processed by this call
    pub fn is_skipped(&self) -> bool {
        !matches!(self.status, PageStatus::Processed(_))
    }

    /// Candidate URLs as plain strings, in sorted order
    pub fn link_strings(&self) -> Vec<String> {
        self.links.iter().map(|url| url.to_string()).collect()
    }
}

/// Shared per-page pipeline
pub struct PageProcessor {
    extractor: LinkExtractor,
    ledger: Arc<dyn Ledger>,
    sink: Option<Arc<dyn PageSink>>,
}

impl PageProcessor {
    pub fn new(extractor: LinkExtractor, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            extractor,
            ledger,
            sink: None,
        }
    }

    /// Builds the scope validator and page filter from configuration
    pub fn from_config(config: &Config, ledger: Arc<dyn Ledger>) -> Result<Self, SieveError> {
        let validator = ScopeValidator::new(&config.scope)?;
        let filter = PageFilter::from_config(&config.page);
        Ok(Self::new(LinkExtractor::new(filter, validator), ledger))
    }

    /// Attaches a reporting sink called for every mined page
    pub fn with_sink(mut self, sink: Arc<dyn PageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn extractor(&self) -> &LinkExtractor {
        &self.extractor
    }

    /// Processes one fetch
    ///
    /// # Returns
    ///
    /// * `Ok(PageResult)` - Candidates (possibly none) for the frontier
    /// * `Err(SieveError)` - Ledger or sink failure; the URL is left unvisited
    pub fn process(&self, outcome: &FetchOutcome) -> Result<PageResult, SieveError> {
        let url = match CanonicalUrl::parse(&outcome.requested_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping page '{}': {}", outcome.requested_url, e);
                return Ok(PageResult::without_links(None, PageStatus::InvalidUrl));
            }
        };

        if !self.ledger.claim(&url)? {
            tracing::debug!("Already seen: {}", url);
            return Ok(PageResult::without_links(Some(url), PageStatus::AlreadySeen));
        }

        let processed = self
            .process_claimed(&url, &outcome.status)
            .and_then(|result| {
                self.ledger.mark_seen(&url)?;
                Ok(result)
            });

        // The claim goes away whether or not the page made it into the ledger
        let released = self.ledger.release(&url);

        let result = processed?;
        released?;

        tracing::debug!(
            "Processed {} (status {}): {} candidates",
            url,
            outcome.status_code,
            result.links.len()
        );

        Ok(result)
    }

    fn process_claimed(
        &self,
        url: &CanonicalUrl,
        status: &FetchStatus,
    ) -> Result<PageResult, SieveError> {
        let extraction = self.extractor.extract(url, status);

        if let (Some(sink), Some(page)) = (&self.sink, &extraction.page) {
            sink.record(url, page)?;
        }

        Ok(PageResult {
            url: Some(url.clone()),
            status: PageStatus::Processed(extraction.disposition),
            links: extraction.links,
            title: extraction.page.and_then(|page| page.title),
        })
    }
}
