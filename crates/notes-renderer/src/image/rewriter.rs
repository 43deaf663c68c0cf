//! Document tree rewrite for image tags.
//!
//! Replaces each text node containing image tags with a fragment of text
//! nodes and `<a><img></a>` elements, in place.

use crate::tree::{Document, Element, Node};

use super::{ImageUrls, TagMatch, has_image_tag, scan};

/// Result of splicing one text node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spliced {
    /// Number of nodes that replaced the text node.
    pub inserted: usize,
    /// Number of image tags rewritten.
    pub tags: usize,
}

/// Rewrites `[img]` tags in literal text into linked preview images.
#[derive(Debug, Clone)]
pub struct ImageTagRewriter {
    urls: ImageUrls,
}

impl ImageTagRewriter {
    /// Create a rewriter that resolves image paths against `urls`.
    #[must_use]
    pub fn new(urls: ImageUrls) -> Self {
        Self { urls }
    }

    /// Rewrite every text node in the document.
    ///
    /// Text inside `code` and `pre` elements is left alone. Inside an existing
    /// link the preview image is emitted without its own anchor, since anchors
    /// cannot nest. Returns the number of image tags rewritten.
    pub fn rewrite_document(&self, document: &mut Document) -> usize {
        self.rewrite_children(&mut document.children, false)
    }

    fn rewrite_children(&self, children: &mut Vec<Node>, in_link: bool) -> usize {
        let mut tags = 0;
        let mut index = 0;

        while index < children.len() {
            if matches!(children[index], Node::Text(_)) {
                if let Some(spliced) = self.splice_text_node(children, index, in_link) {
                    tags += spliced.tags;
                    // Skip the generated nodes; they never need another pass
                    index += spliced.inserted;
                    continue;
                }
            } else if let Node::Element(element) = &mut children[index]
                && !element.is_literal()
            {
                let in_link = in_link || element.tag == "a";
                tags += self.rewrite_children(&mut element.children, in_link);
            }
            index += 1;
        }

        tags
    }

    /// Replace the text node at `children[index]` with its rewritten fragment.
    ///
    /// Returns `None` and leaves `children` untouched when the node is not a
    /// text node or contains no image tag.
    pub fn rewrite_text_node(&self, children: &mut Vec<Node>, index: usize) -> Option<Spliced> {
        self.splice_text_node(children, index, false)
    }

    fn splice_text_node(
        &self,
        children: &mut Vec<Node>,
        index: usize,
        in_link: bool,
    ) -> Option<Spliced> {
        let Some(Node::Text(text)) = children.get(index) else {
            return None;
        };
        if !has_image_tag(text) {
            return None;
        }

        let mut fragment = Vec::new();
        let mut last = 0;
        let mut tags = 0;

        for tag in scan(text) {
            if tag.range.start > last {
                fragment.push(Node::text(&text[last..tag.range.start]));
            }
            let img = self.preview_image(&tag);
            if in_link {
                fragment.push(img.into());
            } else {
                fragment.push(self.image_link(&tag, img));
            }
            last = tag.range.end;
            tags += 1;
        }

        if tags == 0 {
            return None;
        }
        if last < text.len() {
            fragment.push(Node::text(&text[last..]));
        }

        let inserted = fragment.len();
        children.splice(index..=index, fragment);
        Some(Spliced { inserted, tags })
    }

    /// Build `<img src alt loading width? height?>` for one tag.
    fn preview_image(&self, tag: &TagMatch<'_>) -> Element {
        let mut img = Element::new("img")
            .with_attr("src", self.urls.preview(tag.path))
            .with_attr("alt", tag.args.alt())
            .with_attr("loading", "lazy");
        if let Some(width) = tag.args.width() {
            img = img.with_attr("width", width.to_string());
        }
        if let Some(height) = tag.args.height() {
            img = img.with_attr("height", height.to_string());
        }
        img
    }

    /// Wrap a preview image in `<a href>` pointing at the original or `link`.
    fn image_link(&self, tag: &TagMatch<'_>, img: Element) -> Node {
        let href = match tag.args.link() {
            Some(link) => link.to_owned(),
            None => self.urls.original(tag.path),
        };

        Element::new("a")
            .with_attr("href", href)
            .with_children(vec![img.into()])
            .into()
    }
}
