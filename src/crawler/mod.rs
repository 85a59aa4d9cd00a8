//! Crawler core invoked once per fetched page
//!
//! This module contains the per-page logic, including:
//! - Classifying what the fetch scheduler reports
//! - HTML parsing (visible text, links, robots directives)
//! - The page filter
//! - Link extraction against the scope rules
//! - The ledger-guarded pipeline tying them together

mod extractor;
mod filter;
mod outcome;
mod parser;
mod processor;

pub use extractor::{Disposition, Extraction, LinkExtractor};
pub use filter::{PageFilter, PageVerdict};
pub use outcome::{FetchOutcome, FetchStatus};
pub use parser::{parse_page, ParsedPage};
pub use processor::{PageProcessor, PageResult, PageSink, PageStatus};
