//! Markdown report generation
//!
//! This module writes a human-readable markdown report of the crawl:
//! run information, ledger and token totals, and the most common words.

use crate::output::stats::CrawlStatistics;
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report to `output_path`
///
/// # Arguments
///
/// * `stats` - Statistics loaded from storage
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(OutputError)` - Failed to write the report
pub fn generate_markdown_report(stats: &CrawlStatistics, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(stats);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats crawl statistics as markdown
pub fn format_markdown_report(stats: &CrawlStatistics) -> String {
    let mut md = String::new();

    md.push_str("# Link-Sieve Crawl Report\n\n");

    if let Some(run) = &stats.latest_run {
        md.push_str("## Run Information\n\n");
        md.push_str(&format!("- **Run ID**: {}\n", run.id));
        md.push_str(&format!("- **Started**: {}\n", run.started_at));
        if let Some(finished) = &run.finished_at {
            md.push_str(&format!("- **Finished**: {}\n", finished));
        }
        md.push_str(&format!("- **Status**: {}\n", run.status.to_db_string()));
        md.push_str(&format!("- **Config Hash**: {}\n\n", run.config_hash));
    }

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pages Visited**: {}\n", stats.visited_pages));
    md.push_str(&format!(
        "- **Tokens**: {} ({} distinct)\n",
        stats.total_tokens, stats.distinct_tokens
    ));
    md.push_str(&format!(
        "- **Content Tokens**: {} ({} distinct)\n\n",
        stats.total_content_tokens, stats.distinct_content_tokens
    ));

    if !stats.top_content_tokens.is_empty() {
        md.push_str("## Most Common Words\n\n");
        md.push_str("| Rank | Word | Count |\n");
        md.push_str("|------|------|-------|\n");

        for (rank, (token, count)) in stats.top_content_tokens.iter().enumerate() {
            md.push_str(&format!("| {} | {} | {} |\n", rank + 1, token, count));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str(&format!(
        "*Report generated at {}*\n",
        chrono::Utc::now().to_rfc3339()
    ));

    md
}
