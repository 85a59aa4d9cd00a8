//! Word-frequency reporting sink
//!
//! Counts tokens on every mined page and merges them into the token store.
//! Two tables are kept: every token, and tokens with English stop words
//! removed.

use crate::config::ReportConfig;
use crate::crawler::{PageSink, ParsedPage};
use crate::storage::TokenStore;
use crate::url::CanonicalUrl;
use crate::SieveError;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Default English stop words
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does", "doesn't",
    "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had", "hadn't",
    "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her", "here",
    "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd", "i'll",
    "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself", "let's", "me",
    "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own", "same",
    "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so", "some", "such",
    "than", "that", "that's", "the", "their", "theirs", "them", "themselves", "then", "there",
    "there's", "these", "they", "they'd", "they'll", "they're", "they've", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "wasn't", "we", "we'd", "we'll",
    "we're", "we've", "were", "weren't", "what", "what's", "when", "when's", "where", "where's",
    "which", "while", "who", "who's", "whom", "why", "why's", "with", "won't", "would", "wouldn't",
    "you", "you'd", "you'll", "you're", "you've", "your", "yours", "yourself", "yourselves",
];

/// Splits text into lowercase alphanumeric tokens
///
/// An apostrophe is kept only between two alphanumeric characters, so
/// contractions stay whole and quotes fall away.
///
/// ```
/// use link_sieve::output::tokenize;
///
/// assert_eq!(tokenize("Don't panic: 42 'quoted' words"), vec!["don't", "panic", "42", "quoted", "words"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        } else if c == '\''
            && !current.is_empty()
            && chars.peek().map(|next| next.is_alphanumeric()).unwrap_or(false)
        {
            current.push(c);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Page sink that accumulates word frequencies
pub struct WordFrequencyRecorder {
    store: Arc<dyn TokenStore>,
    stop_words: HashSet<String>,
}

impl WordFrequencyRecorder {
    /// Creates a recorder using the built-in stop words
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_stop_words(store, STOP_WORDS.iter().copied())
    }

    pub fn with_stop_words<I, S>(store: Arc<dyn TokenStore>, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            store,
            stop_words: stop_words
                .into_iter()
                .map(|word| word.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    /// Uses the configured stop words, or the built-in list if none are set
    pub fn from_config(store: Arc<dyn TokenStore>, config: &ReportConfig) -> Self {
        match &config.stop_words {
            Some(words) => Self::with_stop_words(store, words),
            None => Self::new(store),
        }
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Counts tokens in `text`
    ///
    /// # Returns
    ///
    /// `(all, content)` where `content` leaves out stop words.
    pub fn count_tokens(&self, text: &str) -> (HashMap<String, u64>, HashMap<String, u64>) {
        let mut all: HashMap<String, u64> = HashMap::new();
        let mut content: HashMap<String, u64> = HashMap::new();

        for token in tokenize(text) {
            if !self.is_stop_word(&token) {
                *content.entry(token.clone()).or_insert(0) += 1;
            }
            *all.entry(token).or_insert(0) += 1;
        }

        (all, content)
    }
}

impl PageSink for WordFrequencyRecorder {
    fn record(&self, url: &CanonicalUrl, page: &ParsedPage) -> Result<(), SieveError> {
        let (all, content) = self.count_tokens(&page.text);
        if all.is_empty() {
            return Ok(());
        }

        if self.store.merge_counts(url, &all, &content)? {
            tracing::debug!("Recorded {} distinct tokens from {}", all.len(), url);
        } else {
            tracing::debug!("Tokens from {} already recorded", url);
        }
        Ok(())
    }
}
