//! Integration tests for the per-page pipeline
//!
//! These tests drive the public API the way a fetch scheduler would: fetch
//! outcomes go in, candidate URLs come out, and the ledger and token tables
//! persist in between.

mod dedup;
mod persistence;
mod pipeline;

use link_sieve::config::Config;
use link_sieve::crawler::PageProcessor;
use link_sieve::storage::{Ledger, SqliteStorage};
use link_sieve::url::CanonicalUrl;
use std::sync::Arc;

/// Builds an HTML page with `words` distinct body words and the given links
pub fn html_page(words: usize, head: &str, links: &[&str]) -> Vec<u8> {
    let text: Vec<String> = (0..words).map(|i| format!("word{}", i)).collect();
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}"></a>"#, href))
        .collect();

    format!(
        "<!DOCTYPE html><html><head>{}</head><body><p>{}</p>{}</body></html>",
        head,
        text.join(" "),
        anchors
    )
    .into_bytes()
}

/// Whether the ledger holds the canonical form of `url`
pub fn seen(storage: &SqliteStorage, url: &str) -> bool {
    storage
        .already_seen(&CanonicalUrl::parse(url).unwrap())
        .unwrap()
}

/// Default-config processor over a fresh in-memory store
pub fn in_memory_processor() -> (Arc<PageProcessor>, Arc<SqliteStorage>) {
    let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let processor = PageProcessor::from_config(&Config::default(), storage.clone()).unwrap();
    (Arc::new(processor), storage)
}
