use crate::{html_page, in_memory_processor};
use link_sieve::config::Config;
use link_sieve::crawler::{FetchOutcome, PageProcessor, PageStatus};
use link_sieve::output::WordFrequencyRecorder;
use link_sieve::storage::{Ledger, SqliteStorage, TokenStore, TokenTable};
use link_sieve::url::CanonicalUrl;
use std::sync::Arc;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_mark_seen_has_single_winner() {
    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let variants = [
        "https://ics.uci.edu/race",
        "https://www.ics.uci.edu/race/",
        "https://ics.uci.edu/race#start",
        "HTTPS://ICS.UCI.EDU//race",
    ];

    let handles: Vec<_> = variants
        .iter()
        .cycle()
        .take(16)
        .map(|raw| {
            let storage = storage.clone();
            let url = CanonicalUrl::parse(raw).unwrap();
            tokio::task::spawn_blocking(move || storage.mark_seen(&url).unwrap())
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(storage.visited_count().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_equivalent_urls_processed_once() {
    let (processor, storage) = in_memory_processor();
    let variants = [
        "https://ics.uci.edu/~alice/",
        "https://www.ics.uci.edu/%7Ealice",
        "https://ics.uci.edu/~alice#cv",
        "HTTPS://WWW.ICS.UCI.EDU/~alice//",
    ];

    let handles: Vec<_> = variants
        .iter()
        .cycle()
        .take(24)
        .map(|url| {
            let processor = processor.clone();
            let outcome = FetchOutcome::success(*url, html_page(150, "", &["/~alice/papers"]));
            tokio::task::spawn_blocking(move || processor.process(&outcome).unwrap())
        })
        .collect();

    let mut processed = 0;
    let mut skipped = 0;
    for handle in handles {
        let result = handle.await.unwrap();
        match result.status {
            PageStatus::Processed(_) => {
                processed += 1;
                assert_eq!(result.link_strings(), vec!["https://ics.uci.edu/~alice/papers"]);
            }
            PageStatus::AlreadySeen => {
                skipped += 1;
                assert!(result.links.is_empty());
            }
            PageStatus::InvalidUrl => panic!("unexpected invalid URL"),
        }
    }

    assert_eq!(processed, 1);
    assert_eq!(skipped, 23);
    assert_eq!(storage.visited_count().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_pages_accumulate_tokens() {
    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let recorder = WordFrequencyRecorder::new(storage.clone());
    let processor = Arc::new(
        PageProcessor::from_config(&Config::default(), storage.clone())
            .unwrap()
            .with_sink(Arc::new(recorder)),
    );

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let processor = processor.clone();
            let url = format!("https://informatics.uci.edu/page{}", i);
            let outcome = FetchOutcome::success(url, html_page(120, "", &[]));
            tokio::task::spawn_blocking(move || processor.process(&outcome).unwrap())
        })
        .collect();

    for handle in handles {
        assert!(!handle.await.unwrap().is_skipped());
    }

    assert_eq!(storage.visited_count().unwrap(), 10);
    assert_eq!(storage.total_tokens(TokenTable::All).unwrap(), 1200);
    assert_eq!(storage.distinct_tokens(TokenTable::All).unwrap(), 120);
    assert_eq!(
        storage.top_tokens(TokenTable::Content, 1).unwrap()[0].1,
        10
    );
}
