//! Storage traits and error types
//!
//! This module defines the trait interfaces for the visited ledger, the token
//! frequency tables and crawl-run bookkeeping, plus their error type.

use crate::storage::{RunRecord, TokenTable};
use crate::url::CanonicalUrl;
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Storage lock poisoned by a panicked worker")]
    LockPoisoned,

    #[error("Run not found: {0}")]
    RunNotFound(i64),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable record of URLs already processed
///
/// Keys are canonical URLs, so every spelling of one resource shares a single
/// entry. Every method takes `&self`; implementations synchronize internally
/// so workers can share one ledger behind an `Arc`.
pub trait Ledger: Send + Sync {
    /// Returns true if the URL has been marked as seen
    fn already_seen(&self, url: &CanonicalUrl) -> StorageResult<bool>;

    /// Records the URL as seen
    ///
    /// # Returns
    ///
    /// `true` if this call inserted the key, `false` if it was already present.
    /// Of any number of concurrent callers exactly one gets `true`.
    fn mark_seen(&self, url: &CanonicalUrl) -> StorageResult<bool>;

    /// Atomically reserves an unvisited URL for processing
    ///
    /// Returns `false` if the URL is already seen or claimed by another worker.
    /// A successful claim must be followed by [`Ledger::release`].
    fn claim(&self, url: &CanonicalUrl) -> StorageResult<bool>;

    /// Drops a claim taken with [`Ledger::claim`]
    fn release(&self, url: &CanonicalUrl) -> StorageResult<()>;

    /// Number of URLs marked as seen
    fn visited_count(&self) -> StorageResult<u64>;
}

/// Additive token counters used for post-crawl reporting
pub trait TokenStore: Send + Sync {
    /// Adds one page's counts to both tables in one transaction
    ///
    /// Merging is idempotent per page: a page whose counts were already
    /// merged is left alone, so retrying a failed page never counts it twice.
    ///
    /// # Arguments
    ///
    /// * `page` - Canonical URL the counts came from
    /// * `all` - Counts over every token on the page
    /// * `content` - Counts with stop words removed
    ///
    /// # Returns
    ///
    /// `true` if the counts were added, `false` if the page was already merged.
    fn merge_counts(
        &self,
        page: &CanonicalUrl,
        all: &HashMap<String, u64>,
        content: &HashMap<String, u64>,
    ) -> StorageResult<bool>;

    /// Most frequent tokens, highest count first, ties broken alphabetically
    fn top_tokens(&self, table: TokenTable, limit: usize) -> StorageResult<Vec<(String, u64)>>;

    /// Number of distinct tokens in a table
    fn distinct_tokens(&self, table: TokenTable) -> StorageResult<u64>;

    /// Sum of all counts in a table
    fn total_tokens(&self, table: TokenTable) -> StorageResult<u64>;
}

/// Crawl-run bookkeeping
pub trait RunStore {
    /// Creates a new crawl run
    ///
    /// # Arguments
    ///
    /// * `config_hash` - Hash of the configuration file
    ///
    /// # Returns
    ///
    /// The ID of the newly created run. URLs marked as seen afterwards
    /// remember this run.
    fn create_run(&self, config_hash: &str) -> StorageResult<i64>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&self, run_id: i64) -> StorageResult<()>;
}
