//! Image tag scanning.
//!
//! Finds `[img attrs]path[/img]` occurrences inside a run of literal text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::ImageTagArgs;

/// Pattern for `[img ...]path[/img]`.
///
/// The attribute section starts with whitespace and may contain quoted
/// strings (which may contain brackets). Unquoted attribute text and the
/// non-greedy body cannot contain brackets or newlines, so an unterminated
/// opener ends at the next `[img` and a tag never spans another tag.
static IMAGE_TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[img((?:\s(?:"[^"]*"|[^"\[\]\n])*)?)\]([^\[\]\n]+?)\[/img\]"#)
        .expect("invalid image tag regex")
});

/// One recognized image tag within a text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagMatch<'a> {
    /// Byte range of the whole tag in the scanned text.
    pub range: Range<usize>,
    /// Image path relative to the storage base URL.
    pub path: &'a str,
    /// Parsed tag attributes.
    pub args: ImageTagArgs,
}

/// Check whether `text` contains at least one image tag.
#[must_use]
pub fn has_image_tag(text: &str) -> bool {
    IMAGE_TAG_PATTERN.is_match(text)
}

/// Scan `text` for image tags, left to right.
///
/// Matches never overlap. A tag without a closing `[/img]`, or whose path is
/// blank, is not a match and stays part of the surrounding text.
///
/// # Example
///
/// ```
/// use notes_renderer::image::scan;
///
/// let tags: Vec<_> = scan(r#"see [img alt="cat"]cat.jpg[/img] here"#).collect();
/// assert_eq!(tags.len(), 1);
/// assert_eq!(tags[0].path, "cat.jpg");
/// assert_eq!(tags[0].range, 4..32);
/// assert_eq!(tags[0].args.alt(), "cat");
/// ```
pub fn scan(text: &str) -> impl Iterator<Item = TagMatch<'_>> {
    IMAGE_TAG_PATTERN.captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let path = caps.get(2)?.as_str().trim();
        if path.is_empty() {
            return None;
        }
        let attrs = caps.get(1).map_or("", |m| m.as_str());
        Some(TagMatch {
            range: whole.range(),
            path,
            args: ImageTagArgs::parse(attrs),
        })
    })
}

/// Remove all image tags from `text`.
///
/// Used for plain-text excerpts, where an image has no textual rendition.
#[must_use]
pub fn strip_image_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for tag in scan(text) {
        out.push_str(&text[last..tag.range.start]);
        last = tag.range.end;
    }
    out.push_str(&text[last..]);
    out
}
