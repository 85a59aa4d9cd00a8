//! Output module for post-crawl reporting
//!
//! This module handles:
//! - The word-frequency sink fed by the page pipeline
//! - Loading and printing crawl statistics
//! - Writing a markdown report

mod markdown;
pub mod stats;
mod tokens;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
pub use tokens::{tokenize, WordFrequencyRecorder, STOP_WORDS};

use crate::storage::{Ledger, RunStore, StorageError, TokenStore};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Loads statistics and writes the markdown report in one step
///
/// # Arguments
///
/// * `storage` - The storage backend to query
/// * `top_n` - How many top tokens to include
/// * `output_path` - Path where the markdown file should be written
pub fn export_report<S>(storage: &S, top_n: usize, output_path: &Path) -> OutputResult<CrawlStatistics>
where
    S: Ledger + TokenStore + RunStore,
{
    let stats = load_statistics(storage, top_n)?;
    generate_markdown_report(&stats, output_path)?;
    tracing::info!("Wrote report to {}", output_path.display());
    Ok(stats)
}
