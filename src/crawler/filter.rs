//! Page filter deciding whether a fetched page is worth mining

use crate::crawler::parser::ParsedPage;
use crate::config::{PageConfig, DEFAULT_MIN_WORD_COUNT};

/// Why a page was or was not mined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    /// Page passes every check
    Mine,

    /// Visible text is below the word threshold
    TooShort { words: usize },

    /// `<meta name="robots">` carries `nofollow`
    NoFollow,
}

impl PageVerdict {
    pub fn should_mine(&self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// Word-count and robots-directive gate applied to every successful page
#[derive(Debug, Clone, Copy)]
pub struct PageFilter {
    min_word_count: usize,
}

impl Default for PageFilter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_WORD_COUNT)
    }
}

impl PageFilter {
    pub fn new(min_word_count: usize) -> Self {
        Self { min_word_count }
    }

    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(config.min_word_count)
    }

    pub fn min_word_count(&self) -> usize {
        self.min_word_count
    }

    /// Evaluates a parsed page
    ///
    /// Short pages are rejected before the robots directive is consulted.
    pub fn verdict(&self, page: &ParsedPage) -> PageVerdict {
        if page.word_count < self.min_word_count {
            return PageVerdict::TooShort {
                words: page.word_count,
            };
        }

        if page.has_nofollow() {
            return PageVerdict::NoFollow;
        }

        PageVerdict::Mine
    }

    pub fn should_mine(&self, page: &ParsedPage) -> bool {
        self.verdict(page).should_mine()
    }
}
