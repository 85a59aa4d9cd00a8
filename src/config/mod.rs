//! Configuration module for Link-Sieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Scope rules, the word-count threshold and storage paths are data, so new
//! crawler traps can be added without touching code.
//!
//! # Example
//!
//! ```no_run
//! use link_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sieve.toml")).unwrap();
//! println!("Allowed domains: {:?}", config.scope.allowed_domains);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, PageConfig, ReportConfig, ScopeConfig, StorageConfig, DEFAULT_ALLOWED_DOMAINS,
    DEFAULT_DISALLOWED_EXTENSIONS, DEFAULT_MIN_WORD_COUNT, DEFAULT_QUERY_BLACKLIST,
    DEFAULT_TOP_TOKENS, DEFAULT_TRAP_PATTERNS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
