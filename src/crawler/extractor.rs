//! Link extraction and aggregation
//!
//! Turns one classified fetch into the set of in-scope canonical URLs the
//! frontier should receive. Links are resolved against the page's canonical
//! URL and a page never lists itself.

use crate::crawler::filter::{PageFilter, PageVerdict};
use crate::crawler::outcome::FetchStatus;
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::scope::ScopeValidator;
use crate::url::CanonicalUrl;
use std::collections::BTreeSet;

/// What happened to a page during extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Fetch failed or returned nothing usable
    Failed,

    /// Redirect; the target is the only candidate
    Redirected,

    /// Body could not be parsed as markup
    Malformed,

    /// Page filter rejected the page
    Filtered(PageVerdict),

    /// Page passed the filter and its links were extracted
    Mined,
}

/// Result of extracting links from one page
#[derive(Debug, Clone)]
pub struct Extraction {
    pub disposition: Disposition,

    /// In-scope candidates, deduplicated and sorted
    pub links: BTreeSet<CanonicalUrl>,

    /// Parsed page, present only when the page was mined
    pub page: Option<ParsedPage>,
}

impl Extraction {
    fn empty(disposition: Disposition) -> Self {
        Self {
            disposition,
            links: BTreeSet::new(),
            page: None,
        }
    }
}

/// Applies the page filter and scope rules to fetched pages
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    filter: PageFilter,
    validator: ScopeValidator,
}

impl LinkExtractor {
    pub fn new(filter: PageFilter, validator: ScopeValidator) -> Self {
        Self { filter, validator }
    }

    pub fn filter(&self) -> &PageFilter {
        &self.filter
    }

    pub fn validator(&self) -> &ScopeValidator {
        &self.validator
    }

    /// Extracts in-scope candidates for one fetch
    ///
    /// # Arguments
    ///
    /// * `base` - Canonical URL of the page that was fetched
    /// * `status` - Classified fetch status
    ///
    /// A malformed page or link is logged and skipped; it never fails the call.
    pub fn extract(&self, base: &CanonicalUrl, status: &FetchStatus) -> Extraction {
        match status {
            FetchStatus::Failure => Extraction::empty(Disposition::Failed),
            FetchStatus::Redirect { target } => {
                let mut extraction = Extraction::empty(Disposition::Redirected);
                extraction.links.extend(self.redirect_candidate(base, target));
                extraction
            }
            FetchStatus::Success { body } => self.extract_from_body(base, body),
        }
    }

    /// Canonicalizes a redirect target and keeps it if in scope
    pub fn redirect_candidate(&self, base: &CanonicalUrl, target: &str) -> Option<CanonicalUrl> {
        match base.join(target) {
            Ok(url) if &url != base && self.validator.is_in_scope(&url) => Some(url),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Skipping redirect target '{}' from {}: {}", target, base, e);
                None
            }
        }
    }

    /// Resolves and filters every href of an already-parsed page
    pub fn collect_links(&self, base: &CanonicalUrl, page: &ParsedPage) -> BTreeSet<CanonicalUrl> {
        let mut links = BTreeSet::new();

        for href in &page.hrefs {
            let url = match base.join(href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("Skipping malformed link '{}' on {}: {}", href, base, e);
                    continue;
                }
            };

            if &url == base {
                continue;
            }

            if self.validator.is_in_scope(&url) {
                links.insert(url);
            }
        }

        links
    }

    fn extract_from_body(&self, base: &CanonicalUrl, body: &[u8]) -> Extraction {
        let page = match parse_page(body, base.as_str()) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("{}", e);
                return Extraction::empty(Disposition::Malformed);
            }
        };

        let verdict = self.filter.verdict(&page);
        if !verdict.should_mine() {
            tracing::debug!("Not mining {}: {:?}", base, verdict);
            return Extraction::empty(Disposition::Filtered(verdict));
        }

        let links = self.collect_links(base, &page);
        tracing::debug!("Mined {} ({} words, {} links)", base, page.word_count, links.len());

        Extraction {
            disposition: Disposition::Mined,
            links,
            page: Some(page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScopeConfig;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(
            PageFilter::default(),
            ScopeValidator::new(&ScopeConfig::default()).unwrap(),
        )
    }

    fn body_with_links(words: usize, links: &[&str]) -> Vec<u8> {
        let text: Vec<String> = (0..words).map(|i| format!("w{}", i)).collect();
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{}"></a>"#, href))
            .collect();
        format!("<html><body><p>{}</p>{}</body></html>", text.join(" "), anchors).into_bytes()
    }

    fn strings(links: &BTreeSet<CanonicalUrl>) -> Vec<&str> {
        links.iter().map(|url| url.as_str()).collect()
    }

    #[test]
    fn test_failure_yields_nothing() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/").unwrap();
        let extraction = extractor().extract(&base, &FetchStatus::Failure);
        assert_eq!(extraction.disposition, Disposition::Failed);
        assert!(extraction.links.is_empty());
    }

    #[test]
    fn test_redirect_in_scope() {
        let base = CanonicalUrl::parse("http://ics.uci.edu/old").unwrap();
        let status = FetchStatus::Redirect {
            target: "https://www.ics.uci.edu/new/".to_string(),
        };
        let extraction = extractor().extract(&base, &status);
        assert_eq!(extraction.disposition, Disposition::Redirected);
        assert_eq!(strings(&extraction.links), vec!["https://ics.uci.edu/new"]);
    }

    #[test]
    fn test_redirect_out_of_scope() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/go").unwrap();
        let status = FetchStatus::Redirect {
            target: "https://example.com/".to_string(),
        };
        assert!(extractor().extract(&base, &status).links.is_empty());
    }

    #[test]
    fn test_redirect_to_self_dropped() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/people").unwrap();
        let status = FetchStatus::Redirect {
            target: "https://www.ics.uci.edu/people/".to_string(),
        };
        assert!(extractor().extract(&base, &status).links.is_empty());
    }

    #[test]
    fn test_success_extracts_in_scope_links() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/people").unwrap();
        let body = body_with_links(
            120,
            &[
                "/people/",
                "about-us",
                "https://ics.uci.edu/people/#bio",
                "https://calendar.ics.uci.edu/?ical=1",
                "https://stat.uci.edu/seminars",
                "about-us#team",
                "mailto:info@ics.uci.edu",
            ],
        );
        let extraction = extractor().extract(&base, &FetchStatus::Success { body });

        assert_eq!(extraction.disposition, Disposition::Mined);
        assert_eq!(
            strings(&extraction.links),
            vec!["https://ics.uci.edu/about-us", "https://stat.uci.edu/seminars"]
        );
        assert!(extraction.page.is_some());
    }

    #[test]
    fn test_malformed_link_does_not_abort() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/").unwrap();
        let body = body_with_links(120, &["http://[::1", "/research"]);
        let extraction = extractor().extract(&base, &FetchStatus::Success { body });
        assert_eq!(strings(&extraction.links), vec!["https://ics.uci.edu/research"]);
    }

    #[test]
    fn test_short_page_not_mined() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/").unwrap();
        let body = body_with_links(20, &["/research"]);
        let extraction = extractor().extract(&base, &FetchStatus::Success { body });
        assert_eq!(
            extraction.disposition,
            Disposition::Filtered(PageVerdict::TooShort { words: 20 })
        );
        assert!(extraction.links.is_empty());
        assert!(extraction.page.is_none());
    }

    #[test]
    fn test_binary_body_is_malformed() {
        let base = CanonicalUrl::parse("https://ics.uci.edu/logo").unwrap();
        let status = FetchStatus::Success {
            body: vec![0x89, b'P', b'N', b'G', 0, 0],
        };
        let extraction = extractor().extract(&base, &status);
        assert_eq!(extraction.disposition, Disposition::Malformed);
        assert!(extraction.links.is_empty());
    }
}
