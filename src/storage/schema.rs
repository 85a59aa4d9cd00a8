//! Database schema definitions
//!
//! The ledger and the token tables live in the same database file but are
//! written through separate connections, so each has its own batch.

/// Schema owned by the ledger connection
pub const LEDGER_SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Canonical URLs already processed
CREATE TABLE IF NOT EXISTS visited (
    url TEXT PRIMARY KEY,
    first_seen_run INTEGER,
    seen_at TEXT NOT NULL
);
"#;

/// Schema owned by the token connection
pub const TOKEN_SCHEMA_SQL: &str = r#"
-- Every token seen on mined pages
CREATE TABLE IF NOT EXISTS token_counts (
    token TEXT PRIMARY KEY,
    count INTEGER NOT NULL DEFAULT 0
);

-- Same, minus stop words
CREATE TABLE IF NOT EXISTS content_token_counts (
    token TEXT PRIMARY KEY,
    count INTEGER NOT NULL DEFAULT 0
);

-- Pages whose counts are already in the tables above
CREATE TABLE IF NOT EXISTS mined_pages (
    url TEXT PRIMARY KEY
);

CREATE INDEX IF NOT EXISTS idx_token_counts_count ON token_counts(count);
CREATE INDEX IF NOT EXISTS idx_content_token_counts_count ON content_token_counts(count);
"#;

pub fn initialize_ledger_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(LEDGER_SCHEMA_SQL)
}

pub fn initialize_token_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(TOKEN_SCHEMA_SQL)
}
