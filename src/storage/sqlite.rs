//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the storage traits.
//! The ledger and the token tables each get their own connection behind their
//! own mutex, so a worker merging word counts never blocks a worker checking
//! the ledger.

use crate::storage::schema::{initialize_ledger_schema, initialize_token_schema};
use crate::storage::traits::{Ledger, RunStore, StorageError, StorageResult, TokenStore};
use crate::storage::{RunRecord, RunStatus, TokenTable};
use crate::url::CanonicalUrl;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// How long a connection waits for the other one to finish writing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

struct LedgerState {
    conn: Connection,
    in_flight: HashSet<String>,
    current_run: Option<i64>,
}

/// SQLite storage backend
pub struct SqliteStorage {
    ledger: Mutex<LedgerState>,
    tokens: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        let ledger_conn = open_connection(path)?;
        initialize_ledger_schema(&ledger_conn)?;

        let token_conn = open_connection(path)?;
        initialize_token_schema(&token_conn)?;

        tracing::debug!("Opened storage at {}", path.display());

        Ok(Self::from_connections(ledger_conn, token_conn))
    }

    /// Creates an in-memory database
    ///
    /// Nothing survives the instance; each one is an independent crawl.
    pub fn open_in_memory() -> StorageResult<Self> {
        let ledger_conn = Connection::open_in_memory()?;
        initialize_ledger_schema(&ledger_conn)?;

        let token_conn = Connection::open_in_memory()?;
        initialize_token_schema(&token_conn)?;

        Ok(Self::from_connections(ledger_conn, token_conn))
    }

    fn from_connections(ledger_conn: Connection, token_conn: Connection) -> Self {
        Self {
            ledger: Mutex::new(LedgerState {
                conn: ledger_conn,
                in_flight: HashSet::new(),
                current_run: None,
            }),
            tokens: Mutex::new(token_conn),
        }
    }

    fn lock_ledger(&self) -> StorageResult<MutexGuard<'_, LedgerState>> {
        self.ledger.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn lock_tokens(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.tokens.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn open_connection(path: &Path) -> StorageResult<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
    ",
    )?;

    Ok(conn)
}

fn is_visited(conn: &Connection, url: &str) -> StorageResult<bool> {
    let found: Option<i64> = conn
        .query_row("SELECT 1 FROM visited WHERE url = ?1", params![url], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(found.is_some())
}

fn read_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

impl Ledger for SqliteStorage {
    fn already_seen(&self, url: &CanonicalUrl) -> StorageResult<bool> {
        let state = self.lock_ledger()?;
        is_visited(&state.conn, url.as_str())
    }

    fn mark_seen(&self, url: &CanonicalUrl) -> StorageResult<bool> {
        let state = self.lock_ledger()?;
        let now = Utc::now().to_rfc3339();

        let inserted = state.conn.execute(
            "INSERT OR IGNORE INTO visited (url, first_seen_run, seen_at) VALUES (?1, ?2, ?3)",
            params![url.as_str(), state.current_run, now],
        )?;

        Ok(inserted == 1)
    }

    fn claim(&self, url: &CanonicalUrl) -> StorageResult<bool> {
        let mut state = self.lock_ledger()?;
        let key = url.as_str();

        if state.in_flight.contains(key) || is_visited(&state.conn, key)? {
            return Ok(false);
        }

        state.in_flight.insert(key.to_string());
        Ok(true)
    }

    fn release(&self, url: &CanonicalUrl) -> StorageResult<()> {
        let mut state = self.lock_ledger()?;
        state.in_flight.remove(url.as_str());
        Ok(())
    }

    fn visited_count(&self) -> StorageResult<u64> {
        let state = self.lock_ledger()?;
        let count: i64 = state
            .conn
            .query_row("SELECT COUNT(*) FROM visited", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl TokenStore for SqliteStorage {
    fn merge_counts(
        &self,
        page: &CanonicalUrl,
        all: &HashMap<String, u64>,
        content: &HashMap<String, u64>,
    ) -> StorageResult<bool> {
        let mut conn = self.lock_tokens()?;
        let tx = conn.transaction()?;

        let first_merge = tx.execute(
            "INSERT OR IGNORE INTO mined_pages (url) VALUES (?1)",
            params![page.as_str()],
        )? == 1;
        if !first_merge {
            return Ok(false);
        }

        for (table, counts) in [(TokenTable::All, all), (TokenTable::Content, content)] {
            let mut stmt = tx.prepare_cached(&format!(
                "INSERT INTO {} (token, count) VALUES (?1, ?2)
                 ON CONFLICT(token) DO UPDATE SET count = count + excluded.count",
                table.table_name()
            ))?;

            for (token, count) in counts {
                stmt.execute(params![token, *count as i64])?;
            }
        }

        tx.commit()?;
        Ok(true)
    }

    fn top_tokens(&self, table: TokenTable, limit: usize) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.lock_tokens()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT token, count FROM {} ORDER BY count DESC, token ASC LIMIT ?1",
            table.table_name()
        ))?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut tokens = Vec::new();
        for row in rows {
            tokens.push(row?);
        }
        Ok(tokens)
    }

    fn distinct_tokens(&self, table: TokenTable) -> StorageResult<u64> {
        let conn = self.lock_tokens()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.table_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn total_tokens(&self, table: TokenTable) -> StorageResult<u64> {
        let conn = self.lock_tokens()?;
        let total: i64 = conn.query_row(
            &format!("SELECT COALESCE(SUM(count), 0) FROM {}", table.table_name()),
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }
}

impl RunStore for SqliteStorage {
    fn create_run(&self, config_hash: &str) -> StorageResult<i64> {
        let mut state = self.lock_ledger()?;
        let now = Utc::now().to_rfc3339();

        state.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;

        let run_id = state.conn.last_insert_rowid();
        state.current_run = Some(run_id);
        Ok(run_id)
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let state = self.lock_ledger()?;
        state
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                read_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let state = self.lock_ledger()?;
        let run = state
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                read_run,
            )
            .optional()?;
        Ok(run)
    }

    fn complete_run(&self, run_id: i64) -> StorageResult<()> {
        let mut state = self.lock_ledger()?;
        let now = Utc::now().to_rfc3339();

        let updated = state.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![RunStatus::Completed.to_db_string(), now, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }

        if state.current_run == Some(run_id) {
            state.current_run = None;
        }
        Ok(())
    }
}
