//! HTML parser for extracting title, visible text and links
//!
//! Parsing is error-tolerant: any byte soup yields a document, possibly
//! with no title, no text and no links.

use crate::url::normalize_url;
use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose text content is never visible
const INVISIBLE_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>`, if non-empty
    pub title: Option<String>,

    /// Stripped visible text nodes in document order
    pub text_nodes: Vec<String>,

    /// Normalized outbound links in document order (may repeat)
    pub links: Vec<Url>,
}

impl ParsedPage {
    /// All visible text joined by single spaces
    pub fn full_text(&self) -> String {
        self.text_nodes.join(" ")
    }

    /// The first `limit` text nodes joined by single spaces
    pub fn text_prefix(&self, limit: usize) -> String {
        self.text_nodes
            .iter()
            .take(limit)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parses HTML content and extracts title, visible text and links
///
/// # Link Extraction Rules
///
/// Every `<a href>` is resolved against `base_url` with
/// [`normalize_url`]. References that fail normalization (other schemes,
/// malformed) are dropped. Fragment-only references resolve to the page
/// itself.
///
/// # Example
///
/// ```
/// use linkrank::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page/">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text_nodes: extract_text_nodes(&document),
        links: extract_links(&document, base_url),
    }
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

/// Collects stripped, non-empty text nodes outside invisible elements
fn extract_text_nodes(document: &Html) -> Vec<String> {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = match node.value() {
                Node::Text(text) => text,
                _ => return None,
            };
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .map_or(false, |name| INVISIBLE_PARENTS.contains(&name));
            if hidden {
                return None;
            }
            let stripped = text.trim();
            (!stripped.is_empty()).then(|| stripped.to_string())
        })
        .collect()
}

/// Extracts all valid links from the HTML document
fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| normalize_url(href, Some(base_url)).ok())
        .collect()
}
