//! Storage module for persisting crawl state
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - The visited/dedup ledger with in-flight claims
//! - Additive token frequency tables
//! - Run tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{Ledger, RunStore, StorageError, StorageResult, TokenStore};

use std::path::Path;

/// Opens (creating if needed) the crawl database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully opened storage
/// * `Err(StorageError)` - Failed to open or initialize the database
pub fn open_storage(path: &Path) -> StorageResult<SqliteStorage> {
    SqliteStorage::open(path)
}

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Which token frequency table to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTable {
    /// Every token
    All,
    /// Tokens minus stop words
    Content,
}

impl TokenTable {
    pub(crate) fn table_name(&self) -> &'static str {
        match self {
            Self::All => "token_counts",
            Self::Content => "content_token_counts",
        }
    }
}
