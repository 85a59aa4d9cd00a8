//! Statistics generation from crawl database
//!
//! This module provides functionality for extracting and displaying
//! crawl statistics from the storage layer.

use crate::output::OutputResult;
use crate::storage::{Ledger, RunRecord, RunStore, TokenStore, TokenTable};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of canonical URLs in the ledger
    pub visited_pages: u64,

    /// Tokens counted over all mined pages
    pub total_tokens: u64,

    /// Distinct tokens over all mined pages
    pub distinct_tokens: u64,

    /// Tokens counted with stop words removed
    pub total_content_tokens: u64,

    /// Distinct tokens with stop words removed
    pub distinct_content_tokens: u64,

    /// Most frequent non-stop-word tokens, highest first
    pub top_content_tokens: Vec<(String, u64)>,

    /// Most recent crawl run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `top_n` - How many top tokens to include
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Successfully loaded statistics
/// * `Err(OutputError)` - Failed to query statistics
pub fn load_statistics<S>(storage: &S, top_n: usize) -> OutputResult<CrawlStatistics>
where
    S: Ledger + TokenStore + RunStore,
{
    Ok(CrawlStatistics {
        visited_pages: storage.visited_count()?,
        total_tokens: storage.total_tokens(TokenTable::All)?,
        distinct_tokens: storage.distinct_tokens(TokenTable::All)?,
        total_content_tokens: storage.total_tokens(TokenTable::Content)?,
        distinct_content_tokens: storage.distinct_tokens(TokenTable::Content)?,
        top_content_tokens: storage.top_tokens(TokenTable::Content, top_n)?,
        latest_run: storage.get_latest_run()?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    if let Some(run) = &stats.latest_run {
        println!("Latest run: #{} ({})", run.id, run.status.to_db_string());
        println!("  Started: {}", run.started_at);
        if let Some(finished) = &run.finished_at {
            println!("  Finished: {}", finished);
        }
        println!();
    }

    println!("Overview:");
    println!("  Pages visited: {}", stats.visited_pages);
    println!(
        "  Tokens: {} ({} distinct)",
        stats.total_tokens, stats.distinct_tokens
    );
    println!(
        "  Content tokens: {} ({} distinct)",
        stats.total_content_tokens, stats.distinct_content_tokens
    );
    println!();

    if stats.top_content_tokens.is_empty() {
        println!("No pages mined yet.");
        return;
    }

    println!("Top {} Words:", stats.top_content_tokens.len());
    for (rank, (token, count)) in stats.top_content_tokens.iter().enumerate() {
        println!("  {:>3}. {:<24} {}", rank + 1, token, count);
    }
}
