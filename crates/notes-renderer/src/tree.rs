//! Owned document tree built from pulldown-cmark events.
//!
//! The tree is the intermediate representation between parsing and HTML
//! serialization. Extensions such as the image tag rewriter operate on it
//! after the markdown grammar has already classified what is literal text.

use std::collections::BTreeMap;

use pulldown_cmark::{Alignment, CodeBlockKind, CowStr, Event, HeadingLevel, Tag, TagEnd};

/// Node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, escaped on serialization.
    Text(String),
    /// Markup element with attributes and ordered children.
    Element(Element),
    /// Raw HTML from the markdown source, emitted verbatim.
    Raw(String),
}

impl Node {
    /// Create a text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Text content of this node and its descendants.
    ///
    /// Raw HTML contributes nothing.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text_content(&mut out);
        out
    }

    fn push_text_content(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.push_text_content(out);
                }
            }
            Self::Raw(_) => {}
        }
    }
}

/// Element node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name (e.g., "p", "a", "img").
    pub tag: String,
    /// Attributes, kept sorted so serialization is deterministic.
    pub attrs: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with the given tag and no attributes.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Set children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    /// Whether the element holds literal code whose text must not be rewritten.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self.tag.as_str(), "code" | "pre")
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level block nodes.
    pub children: Vec<Node>,
}

/// Build a document tree from markdown events.
///
/// Adjacent text events (including soft breaks, which become `\n`) are merged
/// into a single text node, so text the parser split at bracket boundaries is
/// seen whole by later passes.
pub fn build_document<'a, I>(events: I) -> Document
where
    I: Iterator<Item = Event<'a>>,
{
    let mut builder = TreeBuilder::default();
    for event in events {
        builder.event(event);
    }
    builder.finish()
}

/// State for tracking table cells.
#[derive(Default)]
struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    fn current_alignment(&self) -> Option<&'static str> {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => Some("text-align:left"),
            Some(Alignment::Center) => Some("text-align:center"),
            Some(Alignment::Right) => Some("text-align:right"),
            Some(Alignment::None) | None => None,
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Element>,
    table: TableState,
}

impl TreeBuilder {
    fn finish(mut self) -> Document {
        // Unbalanced events should not happen; close whatever is left.
        while !self.stack.is_empty() {
            self.close();
        }
        Document {
            children: self.root,
        }
    }

    fn children(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(element) => &mut element.children,
            None => &mut self.root,
        }
    }

    fn open(&mut self, element: Element) {
        self.stack.push(element);
    }

    fn close(&mut self) {
        if let Some(element) = self.stack.pop() {
            self.children().push(Node::Element(element));
        }
    }

    fn append(&mut self, node: Node) {
        self.children().push(node);
    }

    fn push_text(&mut self, text: &str) {
        let children = self.children();
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Node::text(text));
        }
    }

    fn push_raw(&mut self, html: &str) {
        let children = self.children();
        if let Some(Node::Raw(last)) = children.last_mut() {
            last.push_str(html);
        } else {
            children.push(Node::Raw(html.to_owned()));
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => {
                self.append(Element::new("code").with_children(vec![Node::text(&*code)]).into());
            }
            Event::Html(html) | Event::InlineHtml(html) => self.push_raw(&html),
            Event::SoftBreak => self.push_text("\n"),
            Event::HardBreak => self.append(Element::new("br").into()),
            Event::Rule => self.append(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if checked {
                    input = input.with_attr("checked", "");
                }
                self.append(input.into());
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading { level, id, .. } => {
                let mut heading = Element::new(heading_tag(level));
                if let Some(id) = id {
                    heading = heading.with_attr("id", id.into_string());
                }
                self.open(heading);
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let mut code = Element::new("code");
                if let CodeBlockKind::Fenced(info) = kind
                    && let Some(lang) = info.split_whitespace().next()
                {
                    code = code.with_attr("class", format!("language-{lang}"));
                }
                self.open(Element::new("pre"));
                self.open(code);
            }
            Tag::List(start) => match start {
                Some(1) => self.open(Element::new("ol")),
                Some(n) => self.open(Element::new("ol").with_attr("start", n.to_string())),
                None => self.open(Element::new("ul")),
            },
            Tag::Item => self.open(Element::new("li")),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.open(Element::new("dl")),
            Tag::DefinitionListTitle => self.open(Element::new("dt")),
            Tag::DefinitionListDefinition => self.open(Element::new("dd")),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell_index = 0;
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                self.table.cell_index = 0;
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.table.in_head { "th" } else { "td" });
                if let Some(style) = self.table.current_alignment() {
                    cell = cell.with_attr("style", style);
                }
                self.open(cell);
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("del")),
            Tag::Superscript => self.open(Element::new("sup")),
            Tag::Subscript => self.open(Element::new("sub")),
            Tag::Link {
                dest_url, title, ..
            } => self.open(with_title(
                Element::new("a").with_attr("href", dest_url.into_string()),
                &title,
            )),
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text arrives as child events and is folded in on close
                self.open(with_title(
                    Element::new("img").with_attr("src", dest_url.into_string()),
                    &title,
                ));
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::CodeBlock => {
                self.close();
                self.close();
            }
            TagEnd::TableHead => {
                self.close();
                self.close();
                self.table.in_head = false;
            }
            TagEnd::TableCell => {
                self.close();
                self.table.cell_index += 1;
            }
            TagEnd::Table => {
                if let Some(table) = self.stack.last_mut() {
                    wrap_table_body(table);
                }
                self.close();
            }
            TagEnd::Image => {
                if let Some(image) = self.stack.pop() {
                    let alt: String = image.children.iter().map(Node::text_content).collect();
                    let image = Element {
                        children: Vec::new(),
                        ..image
                    };
                    self.append(image.with_attr("alt", alt).into());
                }
            }
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::TableRow
            | TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::Link => self.close(),
        }
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn with_title(element: Element, title: &CowStr<'_>) -> Element {
    if title.is_empty() {
        element
    } else {
        element.with_attr("title", title.to_string())
    }
}

/// Move body rows after `<thead>` into a `<tbody>`.
fn wrap_table_body(table: &mut Element) {
    let head_end = usize::from(matches!(
        table.children.first(),
        Some(Node::Element(head)) if head.tag == "thead"
    ));
    if table.children.len() > head_end {
        let rows = table.children.split_off(head_end);
        table
            .children
            .push(Element::new("tbody").with_children(rows).into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn parse(markdown: &str) -> Document {
        build_document(Parser::new_ext(markdown, Options::ENABLE_TABLES))
    }

    #[test]
    fn test_paragraph_text() {
        let doc = parse("Hello, world!");
        assert_eq!(
            doc.children,
            vec![Element::new("p").with_children(vec![Node::text("Hello, world!")]).into()]
        );
    }

    #[test]
    fn test_bracket_text_merged_into_one_node() {
        let doc = parse("a [img]x.jpg[/img] b");
        let Some(Node::Element(p)) = doc.children.first() else {
            panic!("expected paragraph");
        };
        assert_eq!(p.children, vec![Node::text("a [img]x.jpg[/img] b")]);
    }

    #[test]
    fn test_soft_break_merged_into_text() {
        let doc = parse("first\nsecond");
        let Some(Node::Element(p)) = doc.children.first() else {
            panic!("expected paragraph");
        };
        assert_eq!(p.children, vec![Node::text("first\nsecond")]);
    }

    #[test]
    fn test_inline_elements_split_text() {
        let doc = parse("a *b* c");
        let Some(Node::Element(p)) = doc.children.first() else {
            panic!("expected paragraph");
        };
        assert_eq!(
            p.children,
            vec![
                Node::text("a "),
                Element::new("em").with_children(vec![Node::text("b")]).into(),
                Node::text(" c"),
            ]
        );
    }

    #[test]
    fn test_code_block_structure() {
        let doc = parse("```rust\nfn main() {}\n```");
        let expected: Node = Element::new("pre")
            .with_children(vec![
                Element::new("code")
                    .with_attr("class", "language-rust")
                    .with_children(vec![Node::text("fn main() {}\n")])
                    .into(),
            ])
            .into();
        assert_eq!(doc.children, vec![expected]);
    }

    #[test]
    fn test_image_alt_collected() {
        let doc = parse("![A *cat*](cat.png \"Title\")");
        let Some(Node::Element(p)) = doc.children.first() else {
            panic!("expected paragraph");
        };
        let Some(Node::Element(img)) = p.children.first() else {
            panic!("expected image");
        };
        assert_eq!(img.tag, "img");
        assert_eq!(img.attr("src"), Some("cat.png"));
        assert_eq!(img.attr("alt"), Some("A cat"));
        assert_eq!(img.attr("title"), Some("Title"));
        assert!(img.children.is_empty());
    }

    #[test]
    fn test_table_body_wrapped() {
        let doc = parse("| A | B |\n|:--|--:|\n| 1 | 2 |");
        let Some(Node::Element(table)) = doc.children.first() else {
            panic!("expected table");
        };
        let tags: Vec<&str> = table
            .children
            .iter()
            .filter_map(|n| match n {
                Node::Element(e) => Some(e.tag.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(tags, vec!["thead", "tbody"]);
    }

    #[test]
    fn test_ordered_list_start() {
        let doc = parse("3. three\n4. four");
        let Some(Node::Element(list)) = doc.children.first() else {
            panic!("expected list");
        };
        assert_eq!(list.tag, "ol");
        assert_eq!(list.attr("start"), Some("3"));
        assert_eq!(list.children.len(), 2);
    }

    #[test]
    fn test_raw_html_kept() {
        let doc = parse("<div>\nraw\n</div>");
        let [Node::Raw(html)] = doc.children.as_slice() else {
            panic!("expected a single raw node");
        };
        assert_eq!(html.trim_end(), "<div>\nraw\n</div>");
    }

    #[test]
    fn test_text_content() {
        let node: Node = Element::new("p")
            .with_children(vec![
                Node::text("a "),
                Element::new("strong").with_children(vec![Node::text("b")]).into(),
                Node::Raw("<br>".to_owned()),
            ])
            .into();
        assert_eq!(node.text_content(), "a b");
    }

    #[test]
    fn test_is_literal() {
        assert!(Element::new("code").is_literal());
        assert!(Element::new("pre").is_literal());
        assert!(!Element::new("p").is_literal());
    }
}
