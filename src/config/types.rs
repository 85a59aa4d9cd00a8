use serde::Deserialize;

/// Main configuration structure for Link-Sieve
///
/// Every section is optional; missing sections and keys fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scope: ScopeConfig,
    pub page: PageConfig,
    pub storage: StorageConfig,
    pub report: ReportConfig,
}

/// Link scope rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Domains the crawl may visit; subdomains at any depth are included
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Markers that reject a URL when found in its query string
    #[serde(rename = "query-blacklist")]
    pub query_blacklist: Vec<String>,

    /// Substrings that reject a URL when found anywhere in it
    #[serde(rename = "trap-patterns")]
    pub trap_patterns: Vec<String>,

    /// File extensions (without the dot) that are never crawled
    #[serde(rename = "disallowed-extensions")]
    pub disallowed_extensions: Vec<String>,
}

/// Page mining rules
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Minimum number of visible words for a page to be mined
    #[serde(rename = "min-word-count")]
    pub min_word_count: usize,
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Path to the markdown report file
    #[serde(rename = "report-path")]
    pub report_path: String,
}

/// Word-frequency reporting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Replaces the built-in English stop-word list when set
    #[serde(rename = "stop-words")]
    pub stop_words: Option<Vec<String>>,

    /// Number of tokens listed in statistics and reports
    #[serde(rename = "top-tokens")]
    pub top_tokens: usize,
}

pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    "ics.uci.edu",
    "cs.uci.edu",
    "informatics.uci.edu",
    "stat.uci.edu",
];

pub const DEFAULT_QUERY_BLACKLIST: &[&str] = &[
    "ical=",
    "outlook-ical=",
    "tribe-bar-date=",
    "eventdate=",
    "calendar-view",
    "date=",
    "timeline",
];

pub const DEFAULT_TRAP_PATTERNS: &[&str] = &[
    // wiki revision history and diffs
    "do=diff",
    "do=revisions",
    "action=diff",
    "action=history",
    "oldid=",
    "?rev=",
    "&rev=",
    "?version=",
    "&version=",
    // login and download actions
    "do=login",
    "action=login",
    "do=edit",
    "do=media",
    "action=download",
    "/download/",
    // share links
    "share=",
    "replytocom=",
    // version control mirrors
    "/gitlab/",
    "/git/",
    "/svn/",
    "/trac/",
    // raw document dumps
    "/raw-attachment/",
    "/~raw/",
];

pub const DEFAULT_DISALLOWED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "img", "png", "tif", "tiff", "mid", "mp2",
    "mp3", "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps",
    "eps", "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe",
    "bz2", "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1",
    "thmx", "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar",
    "gz",
];

pub const DEFAULT_MIN_WORD_COUNT: usize = 100;

pub const DEFAULT_TOP_TOKENS: usize = 50;

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            allowed_domains: owned(DEFAULT_ALLOWED_DOMAINS),
            query_blacklist: owned(DEFAULT_QUERY_BLACKLIST),
            trap_patterns: owned(DEFAULT_TRAP_PATTERNS),
            disallowed_extensions: owned(DEFAULT_DISALLOWED_EXTENSIONS),
        }
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            min_word_count: DEFAULT_MIN_WORD_COUNT,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./link-sieve.db".to_string(),
            report_path: "./report.md".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            stop_words: None,
            top_tokens: DEFAULT_TOP_TOKENS,
        }
    }
}
