use crate::{html_page, in_memory_processor, seen};
use link_sieve::config::{Config, ScopeConfig};
use link_sieve::crawler::{
    parse_page, Disposition, FetchOutcome, PageFilter, PageStatus, PageVerdict,
};
use link_sieve::scope::{RejectReason, ScopeDecision, ScopeValidator};
use link_sieve::storage::SqliteStorage;
use link_sieve::url::{canonicalize, CanonicalUrl};
use link_sieve::PageProcessor;
use std::sync::Arc;

#[test]
fn test_people_page_scenario() {
    let (processor, storage) = in_memory_processor();

    let body = html_page(
        120,
        "",
        &[
            "/people/",
            "about-us",
            "https://ics.uci.edu/people/#bio",
            "https://calendar.ics.uci.edu/?ical=1",
        ],
    );
    let outcome = FetchOutcome::success("https://www.ics.uci.edu/people/", body);

    let result = processor.process(&outcome).unwrap();

    assert_eq!(result.status, PageStatus::Processed(Disposition::Mined));
    assert_eq!(result.link_strings(), vec!["https://ics.uci.edu/about-us"]);

    assert!(seen(&storage, "https://ics.uci.edu/people"));
}

#[test]
fn test_equivalent_encodings_share_identity() {
    let base = "https://ics.uci.edu/";
    let variants = [
        "https://ics.uci.edu/~eppstein/pix/#top",
        "https://www.ics.uci.edu/%7Eeppstein/pix",
        "HTTPS://ICS.UCI.EDU/%7eeppstein//pix/",
    ];

    let canonical: Vec<CanonicalUrl> = variants
        .iter()
        .map(|href| canonicalize(base, href).unwrap())
        .collect();

    assert!(canonical.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(canonical[0].as_str(), "https://ics.uci.edu/~eppstein/pix");
}

#[test]
fn test_scope_properties() {
    let validator = ScopeValidator::new(&ScopeConfig::default()).unwrap();
    let check = |url: &str| validator.check(&CanonicalUrl::parse(url).unwrap());

    assert_eq!(
        check("https://grape.ics.uci.edu/wiki/page?ical=1"),
        ScopeDecision::Reject(RejectReason::QueryBlacklist)
    );
    assert_eq!(check("https://www.ics.uci.edu/~eppstein/pix/"), ScopeDecision::Accept);
    assert_eq!(
        check("https://ics.uci.edu.evil.com/"),
        ScopeDecision::Reject(RejectReason::OutOfDomain)
    );
    assert_eq!(
        check("https://notics.uci.edu/"),
        ScopeDecision::Reject(RejectReason::OutOfDomain)
    );
}

#[test]
fn test_should_mine_thresholds() {
    let filter = PageFilter::default();

    let short = parse_page(&html_page(99, "", &[]), "https://ics.uci.edu/").unwrap();
    assert!(!filter.should_mine(&short));

    let long = parse_page(&html_page(150, "", &[]), "https://ics.uci.edu/").unwrap();
    assert!(filter.should_mine(&long));

    let opted_out = parse_page(
        &html_page(150, r#"<meta name="robots" content="noindex,nofollow">"#, &[]),
        "https://ics.uci.edu/",
    )
    .unwrap();
    assert_eq!(filter.verdict(&opted_out), PageVerdict::NoFollow);
}

#[test]
fn test_nofollow_page_yields_no_links_but_is_seen() {
    let (processor, storage) = in_memory_processor();
    let body = html_page(
        200,
        r#"<meta name="Robots" content="NOFOLLOW">"#,
        &["/research", "/about"],
    );

    let result = processor
        .process(&FetchOutcome::success("https://cs.uci.edu/private", body))
        .unwrap();

    assert_eq!(
        result.status,
        PageStatus::Processed(Disposition::Filtered(PageVerdict::NoFollow))
    );
    assert!(result.links.is_empty());

    assert!(seen(&storage, "https://cs.uci.edu/private"));
}

#[test]
fn test_redirect_candidates() {
    let (processor, _storage) = in_memory_processor();

    let result = processor
        .process(&FetchOutcome::redirect(
            "http://www.stat.uci.edu/old",
            "https://www.stat.uci.edu/new/",
        ))
        .unwrap();
    assert_eq!(result.link_strings(), vec!["https://stat.uci.edu/new"]);

    let result = processor
        .process(&FetchOutcome::redirect(
            "https://informatics.uci.edu/go",
            "https://example.com/elsewhere",
        ))
        .unwrap();
    assert!(result.links.is_empty());
}

#[test]
fn test_error_statuses_yield_nothing() {
    let (processor, _storage) = in_memory_processor();

    for (url, status) in [
        ("https://ics.uci.edu/gone", 404),
        ("https://ics.uci.edu/broken", 500),
        ("https://ics.uci.edu/forbidden", 403),
    ] {
        let outcome = FetchOutcome::new(url, status, None, Some(html_page(200, "", &["/x"])));
        let result = processor.process(&outcome).unwrap();
        assert_eq!(result.status, PageStatus::Processed(Disposition::Failed));
        assert!(result.links.is_empty());
    }
}

#[test]
fn test_custom_trap_pattern_from_toml() {
    let config: Config = toml::from_str(
        r#"
        [scope]
        trap-patterns = ["/wp-json/"]

        [page]
        min-word-count = 10
        "#,
    )
    .unwrap();

    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let processor = PageProcessor::from_config(&config, storage).unwrap();

    let body = html_page(20, "", &["/wp-json/v2/posts", "/do=diff/page", "/news"]);
    let result = processor
        .process(&FetchOutcome::success("https://ics.uci.edu/", body))
        .unwrap();

    // Only the configured list applies once it is overridden
    assert_eq!(
        result.link_strings(),
        vec!["https://ics.uci.edu/do=diff/page", "https://ics.uci.edu/news"]
    );
}
