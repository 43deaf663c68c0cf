//! Plain-text preview extraction.
//!
//! A preview is a short excerpt built from the leading blocks of a document,
//! used for feed descriptions and post listings.

use crate::image::strip_image_tags;
use crate::tree::{Document, Node};

/// Appended when the preview was truncated.
pub const ELLIPSIS: char = '…';

/// Elements whose content is separated from what follows by whitespace.
const BLOCK_ELEMENTS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "li",
    "tr",
    "th",
    "td",
    "dt",
    "dd",
    "br",
];

/// Preview extraction limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    /// Maximum preview length in characters, excluding the ellipsis.
    pub max_chars: usize,
    /// Maximum number of leading top-level blocks to draw text from.
    pub max_blocks: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            max_chars: 200,
            max_blocks: 2,
        }
    }
}

/// Extract a plain-text preview from a parsed document.
///
/// Takes the text of the first `max_blocks` top-level blocks that have any,
/// skipping thematic breaks and raw HTML. Image tags are removed, whitespace
/// is collapsed, and the result is cut to `max_chars` characters with
/// [`ELLIPSIS`] appended when anything was cut.
#[must_use]
pub fn extract_preview(document: &Document, options: &PreviewOptions) -> String {
    let blocks: Vec<String> = document
        .children
        .iter()
        .filter_map(block_text)
        .take(options.max_blocks)
        .collect();

    truncate(&blocks.join(" "), options.max_chars)
}

/// Plain text of one top-level block, or `None` if it has no text.
fn block_text(node: &Node) -> Option<String> {
    let mut raw = String::new();
    collect_text(node, &mut raw);
    let text = collapse_whitespace(&strip_image_tags(&raw));
    (!text.is_empty()).then_some(text)
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Raw(_) => {}
        Node::Element(element) => {
            for child in &element.children {
                collect_text(child, out);
            }
            if BLOCK_ELEMENTS.contains(&element.tag.as_str()) {
                out.push(' ');
            }
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", text[..cut].trim_end()),
        None => text.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_document;
    use pulldown_cmark::Parser;

    fn preview(markdown: &str, max_chars: usize, max_blocks: usize) -> String {
        let document = build_document(Parser::new(markdown));
        extract_preview(
            &document,
            &PreviewOptions {
                max_chars,
                max_blocks,
            },
        )
    }

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(preview("Hello *world*.", 200, 2), "Hello world.");
    }

    #[test]
    fn test_block_limit() {
        assert_eq!(preview("One.\n\nTwo.\n\nThree.", 200, 2), "One. Two.");
    }

    #[test]
    fn test_char_limit_with_ellipsis() {
        assert_eq!(preview("abcdefghij", 5, 2), "abcde…");
    }

    #[test]
    fn test_exact_length_not_truncated() {
        assert_eq!(preview("abcde", 5, 2), "abcde");
    }

    #[test]
    fn test_truncation_trims_trailing_space() {
        assert_eq!(preview("abcd efgh", 5, 2), "abcd…");
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        assert_eq!(preview("àèìòùxyz", 5, 2), "àèìòù…");
    }

    #[test]
    fn test_image_tags_removed() {
        assert_eq!(
            preview("Look [img alt=\"x\"]a.jpg[/img] here", 200, 2),
            "Look here"
        );
    }

    #[test]
    fn test_image_only_block_skipped() {
        assert_eq!(preview("[img]a.jpg[/img]\n\nText.", 200, 1), "Text.");
    }

    #[test]
    fn test_rule_and_raw_html_skipped() {
        assert_eq!(
            preview("<div>raw</div>\n\n---\n\nFirst.\n\nSecond.", 200, 2),
            "First. Second."
        );
    }

    #[test]
    fn test_list_items_separated() {
        assert_eq!(preview("- one\n- two", 200, 1), "one two");
    }

    #[test]
    fn test_soft_breaks_collapsed() {
        assert_eq!(preview("line one\nline two", 200, 1), "line one line two");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(preview("", 200, 2), "");
    }
}
