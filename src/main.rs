//! Link-Sieve main entry point
//!
//! This is the command-line interface for the Link-Sieve crawl core.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use link_sieve::config::{load_config_with_hash, Config};
use link_sieve::crawler::{FetchOutcome, PageProcessor, PageResult, PageStatus};
use link_sieve::output::{export_report, load_statistics, print_statistics, WordFrequencyRecorder};
use link_sieve::scope::{ScopeDecision, ScopeValidator};
use link_sieve::storage::{open_storage, RunStore, SqliteStorage};
use link_sieve::url::CanonicalUrl;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Link-Sieve: link discovery and scope control for a focused crawler
///
/// Link-Sieve canonicalizes links, keeps a crawl inside its allowed domains
/// and away from known traps, and remembers every page it has processed.
#[derive(Parser, Debug)]
#[command(name = "link-sieve")]
#[command(version)]
#[command(about = "Link discovery and scope control for a focused crawler", long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["check", "page", "stats", "export_report", "dry_run"])
))]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the canonical form and scope decision of each URL
    #[arg(long, value_name = "URL", num_args = 1..)]
    check: Vec<String>,

    /// Run saved pages through the pipeline and print their candidate links
    #[arg(long, value_name = "URL=FILE", num_args = 1.., value_parser = parse_page_arg)]
    page: Vec<(String, PathBuf)>,

    /// Show statistics from the database and exit
    #[arg(long)]
    stats: bool,

    /// Write the markdown report from existing data and exit
    #[arg(long)]
    export_report: bool,

    /// Validate config and print the effective settings
    #[arg(long)]
    dry_run: bool,
}

/// Splits `URL=FILE` on the last `=`, since URLs carry their own
fn parse_page_arg(value: &str) -> std::result::Result<(String, PathBuf), String> {
    match value.rsplit_once('=') {
        Some((url, file)) if !url.is_empty() && !file.is_empty() => {
            Ok((url.to_string(), PathBuf::from(file)))
        }
        _ => Err(format!("expected URL=FILE, got '{}'", value)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) = load(cli.config.as_deref())?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if !cli.check.is_empty() {
        handle_check(&config, &cli.check)?;
    } else if !cli.page.is_empty() {
        handle_pages(&config, &config_hash, cli.page).await?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export_report {
        handle_export_report(&config)?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("link_sieve=info,warn"),
            1 => EnvFilter::new("link_sieve=debug,info"),
            2 => EnvFilter::new("link_sieve=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> Result<(Config, String)> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        return Ok((Config::default(), "defaults".to_string()));
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok((config, hash))
}

fn open(config: &Config) -> Result<SqliteStorage> {
    let path = Path::new(&config.storage.database_path);
    open_storage(path).with_context(|| format!("Failed to open database {}", path.display()))
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Link-Sieve Dry Run ===\n");

    println!("Allowed Domains ({}):", config.scope.allowed_domains.len());
    for domain in &config.scope.allowed_domains {
        println!("  - {}", domain);
    }

    println!(
        "\nQuery Blacklist: {}",
        config.scope.query_blacklist.join(", ")
    );

    println!("\nTrap Patterns ({}):", config.scope.trap_patterns.len());
    for pattern in &config.scope.trap_patterns {
        println!("  - {}", pattern);
    }

    println!(
        "\nDisallowed Extensions: {}",
        config.scope.disallowed_extensions.len()
    );

    println!("\nPage Filter:");
    println!("  Minimum word count: {}", config.page.min_word_count);

    println!("\nOutput:");
    println!("  Database: {}", config.storage.database_path);
    println!("  Report: {}", config.storage.report_path);
    println!("  Top tokens: {}", config.report.top_tokens);

    println!("\n✓ Configuration is valid");
}

/// Handles the --check mode: canonicalizes and scope-checks each URL
fn handle_check(config: &Config, urls: &[String]) -> Result<()> {
    let validator = ScopeValidator::new(&config.scope).context("Failed to build scope rules")?;

    for raw in urls {
        match CanonicalUrl::parse(raw) {
            Ok(url) => match validator.check(&url) {
                ScopeDecision::Accept => println!("ACCEPT  {}", url),
                ScopeDecision::Reject(reason) => println!("REJECT  {} ({})", url, reason),
            },
            Err(e) => println!("INVALID {} ({})", raw, e),
        }
    }

    Ok(())
}

/// Handles the --page mode: processes saved pages on blocking workers
async fn handle_pages(config: &Config, config_hash: &str, pages: Vec<(String, PathBuf)>) -> Result<()> {
    let storage = Arc::new(open(config)?);
    let run_id = storage.create_run(config_hash)?;
    tracing::info!("Started run {} with {} pages", run_id, pages.len());

    let recorder = WordFrequencyRecorder::from_config(storage.clone(), &config.report);
    let processor = Arc::new(
        PageProcessor::from_config(config, storage.clone())?.with_sink(Arc::new(recorder)),
    );

    let mut handles = Vec::with_capacity(pages.len());
    for (url, file) in pages {
        let processor = processor.clone();
        handles.push(tokio::task::spawn_blocking(move || -> Result<PageResult> {
            let body = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let outcome = FetchOutcome::success(url, body);
            Ok(processor.process(&outcome)?)
        }));
    }

    let mut failures = 0;
    for handle in handles {
        match handle.await.context("Page worker panicked")? {
            Ok(result) => print_page_result(&result),
            Err(e) => {
                tracing::error!("{:#}", e);
                failures += 1;
            }
        }
    }

    storage.complete_run(run_id)?;
    tracing::info!("Run {} complete ({} failed pages)", run_id, failures);

    Ok(())
}

fn print_page_result(result: &PageResult) {
    let url = result
        .url
        .as_ref()
        .map(|url| url.as_str())
        .unwrap_or("<invalid>");

    match &result.status {
        PageStatus::InvalidUrl => println!("{} invalid URL", url),
        PageStatus::AlreadySeen => println!("{} already seen", url),
        PageStatus::Processed(disposition) => {
            println!("{} {:?}: {} candidates", url, disposition, result.links.len());
            for link in &result.links {
                println!("  {}", link);
            }
        }
    }
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<()> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = open(config)?;
    let stats = load_statistics(&storage, config.report.top_tokens)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export-report mode: writes the markdown report
fn handle_export_report(config: &Config) -> Result<()> {
    println!("=== Exporting Crawl Report ===\n");
    println!("Database: {}", config.storage.database_path);
    println!("Output: {}", config.storage.report_path);
    println!();

    let storage = open(config)?;
    export_report(
        &storage,
        config.report.top_tokens,
        Path::new(&config.storage.report_path),
    )?;

    println!("✓ Report exported to: {}", config.storage.report_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_arg_splits_on_last_equals() {
        let (url, file) = parse_page_arg("https://ics.uci.edu/?p=1=page.html").unwrap();
        assert_eq!(url, "https://ics.uci.edu/?p=1");
        assert_eq!(file, PathBuf::from("page.html"));
    }

    #[test]
    fn test_parse_page_arg_rejects_missing_parts() {
        assert!(parse_page_arg("page.html").is_err());
        assert!(parse_page_arg("https://ics.uci.edu/=").is_err());
    }

    #[test]
    fn test_cli_requires_a_mode() {
        assert!(Cli::try_parse_from(["link-sieve"]).is_err());
        assert!(Cli::try_parse_from(["link-sieve", "--stats"]).is_ok());
        assert!(Cli::try_parse_from(["link-sieve", "sieve.toml", "--check", "https://ics.uci.edu/"]).is_ok());
    }
}
