use crate::{html_page, seen};
use link_sieve::config::Config;
use link_sieve::crawler::{FetchOutcome, PageProcessor, PageStatus};
use link_sieve::output::{export_report, load_statistics, WordFrequencyRecorder};
use link_sieve::storage::{RunStatus, RunStore, SqliteStorage};
use std::sync::Arc;
use tempfile::TempDir;

fn processor_at(storage: &Arc<SqliteStorage>) -> PageProcessor {
    let recorder = WordFrequencyRecorder::new(storage.clone());
    PageProcessor::from_config(&Config::default(), storage.clone())
        .unwrap()
        .with_sink(Arc::new(recorder))
}

#[test]
fn test_ledger_survives_restart() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sieve.db");
    let outcome = FetchOutcome::success(
        "https://www.cs.uci.edu/research/",
        html_page(150, "", &["/faculty"]),
    );

    {
        let storage = Arc::new(SqliteStorage::open(&db_path).unwrap());
        let run_id = storage.create_run("first").unwrap();

        let result = processor_at(&storage).process(&outcome).unwrap();
        assert!(!result.is_skipped());

        storage.complete_run(run_id).unwrap();
    }

    let storage = Arc::new(SqliteStorage::open(&db_path).unwrap());
    assert!(seen(&storage, "https://cs.uci.edu/research"));

    let result = processor_at(&storage).process(&outcome).unwrap();
    assert_eq!(result.status, PageStatus::AlreadySeen);

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.config_hash, "first");
}

#[test]
fn test_independent_in_memory_runs() {
    let first = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let second = Arc::new(SqliteStorage::open_in_memory().unwrap());
    let outcome = FetchOutcome::success("https://stat.uci.edu/", html_page(150, "", &[]));

    assert!(!processor_at(&first).process(&outcome).unwrap().is_skipped());
    assert!(!processor_at(&second).process(&outcome).unwrap().is_skipped());
}

#[test]
fn test_report_reflects_mined_pages() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sieve.db");
    let report_path = dir.path().join("report.md");

    let storage = Arc::new(SqliteStorage::open(&db_path).unwrap());
    storage.create_run("report").unwrap();

    let body = b"<html><body><p>Compilers compilers compilers and the theory of parsing. \
        Lexing lexing parsing.</p></body></html>"
        .to_vec();
    let config: Config = toml::from_str("[page]\nmin-word-count = 5").unwrap();
    let recorder = WordFrequencyRecorder::new(storage.clone());
    let processor = PageProcessor::from_config(&config, storage.clone())
        .unwrap()
        .with_sink(Arc::new(recorder));

    processor
        .process(&FetchOutcome::success("https://ics.uci.edu/courses", body))
        .unwrap();

    let stats = load_statistics(storage.as_ref(), 3).unwrap();
    assert_eq!(stats.visited_pages, 1);
    assert_eq!(
        stats.top_content_tokens,
        vec![
            ("compilers".to_string(), 3),
            ("lexing".to_string(), 2),
            ("parsing".to_string(), 2)
        ]
    );

    export_report(storage.as_ref(), 3, &report_path).unwrap();
    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("| 1 | compilers | 3 |"));
    assert!(report.contains("- **Pages Visited**: 1"));
}
