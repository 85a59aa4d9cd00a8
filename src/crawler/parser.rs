//! HTML parser for extracting page text, links and robots directives
//!
//! This module handles parsing a response body to extract:
//! - Visible text (for the word-count threshold and word statistics)
//! - Raw `href` values of hyperlinks
//! - `<meta name="robots">` directives
//! - Page title

use crate::SieveError;
use scraper::{Html, Selector};

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Visible text, whitespace-normalized and joined by single spaces
    pub text: String,

    /// Number of whitespace-separated words in `text`
    pub word_count: usize,

    /// Raw `href` values of every `<a>` carrying one, in document order
    pub hrefs: Vec<String>,

    /// Lowercased directives from every `<meta name="robots">` tag
    pub robots_directives: Vec<String>,
}

impl ParsedPage {
    /// Returns true if the publisher opted the page out of link following
    ///
    /// `none` is shorthand for `noindex, nofollow` and counts as well.
    pub fn has_nofollow(&self) -> bool {
        self.robots_directives
            .iter()
            .any(|directive| directive == "nofollow" || directive == "none")
    }
}

/// Parses a response body
///
/// # Arguments
///
/// * `body` - The raw response body
/// * `url` - The page URL (only used in error messages)
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(SieveError::HtmlParse)` - The body is binary, not markup
///
/// # Example
///
/// ```
/// use link_sieve::crawler::parse_page;
///
/// let html = br#"<html><head><title>ICS</title></head><body><a href="/about">About us</a></body></html>"#;
/// let parsed = parse_page(html, "https://ics.uci.edu/").unwrap();
/// assert_eq!(parsed.title, Some("ICS".to_string()));
/// assert_eq!(parsed.hrefs, vec!["/about".to_string()]);
/// ```
pub fn parse_page(body: &[u8], url: &str) -> Result<ParsedPage, SieveError> {
    if body.contains(&0) {
        return Err(SieveError::HtmlParse {
            url: url.to_string(),
            message: "body contains NUL bytes, not text markup".to_string(),
        });
    }

    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let text = extract_visible_text(&document);
    let word_count = text.split_whitespace().count();

    Ok(ParsedPage {
        title: extract_title(&document),
        text,
        word_count,
        hrefs: extract_hrefs(&document),
        robots_directives: extract_robots_directives(&document),
    })
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects every text node outside script/style/template
fn extract_visible_text(document: &Html) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });

        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Collects raw href values of all hyperlinks
fn extract_hrefs(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Collects the directives of `<meta name="robots" content="...">`
fn extract_robots_directives(document: &Html) -> Vec<String> {
    let Ok(meta_selector) = Selector::parse("meta[name][content]") else {
        return Vec::new();
    };

    document
        .select(&meta_selector)
        .filter(|element| {
            element
                .value()
                .attr("name")
                .map(|name| name.trim().eq_ignore_ascii_case("robots"))
                .unwrap_or(false)
        })
        .filter_map(|element| element.value().attr("content"))
        .flat_map(|content| {
            content
                .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
                .filter(|directive| !directive.is_empty())
                .map(|directive| directive.to_lowercase())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://ics.uci.edu/page";

    #[test]
    fn test_extract_title() {
        let html = b"<html><head><title>  Test Page  </title></head><body></body></html>";
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let html = b"<html><head></head><body></body></html>";
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_visible_text_skips_script_and_style() {
        let html = br#"<html><head><style>body { color: red; }</style></head>
            <body><p>Hello   world</p><script>var hidden = 1;</script><div>again</div></body></html>"#;
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.text, "Hello world again");
        assert_eq!(parsed.word_count, 3);
    }

    #[test]
    fn test_visible_text_includes_nested_elements() {
        let html = b"<html><body><ul><li>one <b>two</b></li><li>three</li></ul></body></html>";
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.word_count, 3);
    }

    #[test]
    fn test_hrefs_in_order() {
        let html = br##"<html><body>
            <a href="/a">A</a>
            <a>no href</a>
            <a href="https://cs.uci.edu/b">B</a>
            <a href="#top">Top</a>
            <a href="">Empty</a>
        </body></html>"##;
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.hrefs, vec!["/a", "https://cs.uci.edu/b", "#top", ""]);
    }

    #[test]
    fn test_robots_nofollow() {
        let html = br#"<html><head><meta name="robots" content="noindex, NoFollow"></head><body></body></html>"#;
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.robots_directives, vec!["noindex", "nofollow"]);
        assert!(parsed.has_nofollow());
    }

    #[test]
    fn test_robots_semicolon_separated() {
        let html = br#"<html><head><meta name="robots" content="noindex;nofollow"></head><body></body></html>"#;
        let parsed = parse_page(html, URL).unwrap();
        assert_eq!(parsed.robots_directives, vec!["noindex", "nofollow"]);
        assert!(parsed.has_nofollow());
    }

    #[test]
    fn test_robots_name_case_insensitive() {
        let html = br#"<html><head><meta name="ROBOTS" content="nofollow"></head><body></body></html>"#;
        let parsed = parse_page(html, URL).unwrap();
        assert!(parsed.has_nofollow());
    }

    #[test]
    fn test_robots_none_counts_as_nofollow() {
        let html = br#"<html><head><meta name="robots" content="none"></head><body></body></html>"#;
        assert!(parse_page(html, URL).unwrap().has_nofollow());
    }

    #[test]
    fn test_robots_follow_only() {
        let html = br#"<html><head><meta name="robots" content="index,follow">
            <meta name="description" content="nofollow"></head><body></body></html>"#;
        let parsed = parse_page(html, URL).unwrap();
        assert!(!parsed.has_nofollow());
    }

    #[test]
    fn test_binary_body_is_parse_error() {
        let body = [0x89, b'P', b'N', b'G', 0x00, 0x01];
        let result = parse_page(&body, URL);
        assert!(matches!(result, Err(SieveError::HtmlParse { .. })));
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let body = b"<html><body><p>caf\xe9 menu</p></body></html>";
        let parsed = parse_page(body, URL).unwrap();
        assert_eq!(parsed.word_count, 2);
    }
}
