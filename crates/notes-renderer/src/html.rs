//! HTML serialization of the document tree.
//!
//! Produces compact HTML5: no whitespace between blocks, attributes in
//! sorted order. The same tree always serializes to the same bytes.

use std::fmt::Write;

use crate::tree::{Document, Element, Node};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Attributes emitted without a value when empty.
const BOOLEAN_ATTRIBUTES: &[&str] = &["checked", "disabled"];

/// Serialize a document to an HTML string.
#[must_use]
pub fn to_html(document: &Document) -> String {
    let mut out = String::with_capacity(4096);
    for node in &document.children {
        write_node(node, &mut out);
    }
    out
}

/// Serialize a single node recursively.
pub fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Raw(html) => out.push_str(html),
        Node::Element(element) => write_element(element, out),
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);

    for (key, value) in &element.attrs {
        if value.is_empty() && BOOLEAN_ATTRIBUTES.contains(&key.as_str()) {
            write!(out, " {key}").unwrap();
        } else {
            write!(out, r#" {key}="{}""#, escape_html(value)).unwrap();
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&element.tag.as_str()) {
        return;
    }

    for child in &element.children {
        write_node(child, out);
    }

    write!(out, "</{}>", element.tag).unwrap();
}

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: Node) -> String {
        to_html(&Document {
            children: vec![node],
        })
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#x27;s");
    }

    #[test]
    fn test_text_escaped() {
        assert_eq!(render(Node::text("1 < 2")), "1 &lt; 2");
    }

    #[test]
    fn test_raw_passthrough() {
        assert_eq!(render(Node::Raw("<b>x</b>".to_owned())), "<b>x</b>");
    }

    #[test]
    fn test_element_with_children() {
        let node = Element::new("p")
            .with_children(vec![
                Node::text("Hello "),
                Element::new("em").with_children(vec![Node::text("you")]).into(),
            ])
            .into();
        assert_eq!(render(node), "<p>Hello <em>you</em></p>");
    }

    #[test]
    fn test_attributes_sorted_and_escaped() {
        let node = Element::new("a")
            .with_attr("title", "Say \"hi\"")
            .with_attr("href", "/x?a=1&b=2")
            .with_children(vec![Node::text("link")])
            .into();
        assert_eq!(
            render(node),
            r#"<a href="/x?a=1&amp;b=2" title="Say &quot;hi&quot;">link</a>"#
        );
    }

    #[test]
    fn test_void_element() {
        let node = Element::new("img")
            .with_attr("src", "a.png")
            .with_attr("alt", "")
            .into();
        assert_eq!(render(node), r#"<img alt="" src="a.png">"#);
    }

    #[test]
    fn test_boolean_attributes() {
        let node = Element::new("input")
            .with_attr("type", "checkbox")
            .with_attr("checked", "")
            .with_attr("disabled", "")
            .into();
        assert_eq!(render(node), r#"<input checked disabled type="checkbox">"#);
    }

    #[test]
    fn test_empty_non_void_element() {
        assert_eq!(render(Element::new("p").into()), "<p></p>");
    }
}
