//! HTML parser for extracting links, title and text
//!
//! The document is parsed with `scraper` and its nodes are then visited in
//! document order, one node at a time, as a bounded forward scan:
//! - a cap on the number of nodes visited ends the scan early
//! - a cap on accumulated text stops content growth but not link discovery
//! - text directly inside a `<script>`, `<style>` or `<javascript>` element
//!   is skipped; an empty one skips nothing
//! - text directly inside the first `<title>` element supplies the title
//!
//! The node cap bounds the scan, not the parse: html5ever builds the whole
//! tree before the first node is visited, so parse cost still grows with the
//! body size. Fetched bodies are bounded by the fetch timeout.

use crate::url::resolve_href;
use scraper::{Html, Node};
use url::Url;

/// Bounds applied to a single page scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    /// Nodes visited before the scan is abandoned
    pub max_tokens: usize,
    /// Raw text bytes accepted into the page content
    pub max_content_length: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_tokens: 25_000,
            max_content_length: 15_000,
        }
    }
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Trimmed text of the first `<title>` element, empty if none was seen
    pub title: String,

    /// Trimmed body text, concatenated without separators
    pub content: String,

    /// Followable links in document order, resolved to absolute URLs
    pub links: Vec<String>,

    /// Whether the node cap ended the scan before the end of the document
    pub truncated: bool,
}

/// Elements whose text children are embedded code
fn skips_text(name: &str) -> bool {
    matches!(name, "script" | "style" | "javascript")
}

/// Parses HTML and extracts title, body text and links
///
/// `html` is decoded lossily; invalid UTF-8 never fails the parse.
///
/// # Example
///
/// ```
/// use kumo_search::crawler::{parse_page, ExtractionLimits};
/// use url::Url;
///
/// let html = br#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &base_url, ExtractionLimits::default());
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_page(html: &[u8], base_url: &Url, limits: ExtractionLimits) -> ParsedPage {
    let document = Html::parse_document(&String::from_utf8_lossy(html));

    let mut page = ParsedPage::default();
    let mut title_node = None;
    let mut within_body = false;
    let mut content_length = 0usize;
    let mut scanned = 0usize;

    for node in document.root_element().descendants() {
        if scanned >= limits.max_tokens {
            page.truncated = true;
            break;
        }
        scanned += 1;

        match node.value() {
            Node::Element(element) => {
                let name = element.name();

                if name == "body" {
                    within_body = true;
                }

                if name == "title" && title_node.is_none() {
                    title_node = Some(node.id());
                }

                if name == "a" {
                    if let Some(link) = element.attr("href").and_then(|h| resolve_href(h, base_url)) {
                        page.links.push(link);
                    }
                }
            }
            Node::Text(text) => {
                let parent = node.parent();

                if parent.is_some_and(|p| p.value().as_element().is_some_and(|e| skips_text(e.name()))) {
                    continue;
                }

                if title_node.is_some() && parent.map(|p| p.id()) == title_node {
                    if page.title.is_empty() {
                        page.title = text.trim().to_string();
                    }
                    continue;
                }

                if within_body && content_length < limits.max_content_length {
                    page.content.push_str(text.trim());
                    content_length += text.len();
                }
            }
            _ => {}
        }
    }

    page
}
