//! Image tag attribute parsing.
//!
//! Parses the attribute section of `[img alt="..." width=640]path[/img]`.

use std::collections::HashMap;

/// Parsed attributes from an image tag.
///
/// Attributes are whitespace-separated `name="value"` or `name=value` pairs
/// in any order. Unknown names are kept; the renderer only acts on `alt`,
/// `width`, `height` and `link`.
///
/// # Example
///
/// ```
/// use notes_renderer::image::ImageTagArgs;
///
/// let args = ImageTagArgs::parse(r#"alt="A cat" width=640 height=oops"#);
/// assert_eq!(args.alt(), "A cat");
/// assert_eq!(args.width(), Some(640));
/// assert_eq!(args.height(), None);
/// assert_eq!(args.get("height"), Some("oops"));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImageTagArgs {
    /// Key-value attributes, first occurrence of each key wins.
    pub attrs: HashMap<String, String>,
}

impl ImageTagArgs {
    /// Parse an attribute string.
    ///
    /// Never fails. Malformed fragments (a bare word, `=value` without a
    /// name, `name=` without a value, an unterminated quote) are skipped and
    /// parsing resumes at the next whitespace-separated token.
    #[must_use]
    pub fn parse(attrs_str: &str) -> Self {
        let mut args = Self::default();
        let mut remaining = attrs_str.trim();

        while !remaining.is_empty() {
            let (pair, rest) = next_pair(remaining);
            if let Some((key, value)) = pair {
                args.attrs
                    .entry(key.to_owned())
                    .or_insert_with(|| value.to_owned());
            }
            remaining = rest.trim_start();
        }

        args
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Alt text, empty when not provided.
    #[must_use]
    pub fn alt(&self) -> &str {
        self.get("alt").unwrap_or_default()
    }

    /// Width in pixels, if provided as a positive integer.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        self.dimension("width")
    }

    /// Height in pixels, if provided as a positive integer.
    #[must_use]
    pub fn height(&self) -> Option<u32> {
        self.dimension("height")
    }

    /// Explicit link target overriding the original image URL.
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.get("link").filter(|link| !link.is_empty())
    }

    fn dimension(&self, key: &str) -> Option<u32> {
        self.get(key)
            .and_then(|value| value.parse::<u32>().ok())
            .filter(|&n| n > 0)
    }
}

/// Parse one `name=value` pair from the start of `s`.
///
/// Returns the pair (or `None` for a malformed fragment) and the unparsed rest.
fn next_pair(s: &str) -> (Option<(&str, &str)>, &str) {
    let name_end = s
        .find(|c: char| c.is_whitespace() || c == '=' || c == '"')
        .unwrap_or(s.len());
    let name = &s[..name_end];

    let Some(after_eq) = s[name_end..].strip_prefix('=') else {
        return (None, skip_token(s));
    };
    if name.is_empty() {
        return (None, skip_token(s));
    }

    if let Some(quoted) = after_eq.strip_prefix('"') {
        // Unterminated quote swallows the rest of the input
        return match quoted.find('"') {
            Some(end) => (Some((name, &quoted[..end])), &quoted[end + 1..]),
            None => (None, ""),
        };
    }

    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
    let value = &after_eq[..end];
    let rest = &after_eq[end..];
    if value.is_empty() {
        (None, rest)
    } else {
        (Some((name, value)), rest)
    }
}

/// Skip to the next whitespace.
fn skip_token(s: &str) -> &str {
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    &s[end..]
}
