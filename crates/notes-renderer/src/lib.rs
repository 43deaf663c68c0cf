//! Markdown rendering pipeline for Notes posts.
//!
//! Post bodies are markdown with one extension: inline image tags,
//! `[img alt="..." width=N height=N link="..."]path[/img]`, where `path` is
//! relative to the configured storage base URL.
//!
//! # Architecture
//!
//! Rendering runs in three passes over an owned document tree:
//!
//! 1. **Parse** ([`tree::build_document`]): pulldown-cmark events become a
//!    [`Document`] of text, element and raw HTML nodes.
//! 2. **Rewrite** ([`ImageTagRewriter`]): every literal text node outside
//!    code is scanned for image tags and spliced into text and
//!    `<a><img></a>` nodes.
//! 3. **Serialize** ([`html::to_html`]): the tree becomes compact HTML.
//!
//! [`MarkdownPipeline::render_with_preview`] also extracts a short
//! plain-text preview from the parsed tree.
//!
//! # Example
//!
//! ```
//! use notes_renderer::{MarkdownPipeline, PipelineConfig};
//!
//! let pipeline = MarkdownPipeline::new(
//!     PipelineConfig::with_storage_base_url("https://cdn.example"),
//! ).unwrap();
//!
//! let rendered = pipeline.render_with_preview(
//!     "A walk [img alt=\"Hills\" width=800]2024/hills.jpg[/img] in the hills.",
//! );
//! assert!(rendered.html.contains(r#"src="https://cdn.example/2024/hills_preview.jpg""#));
//! assert_eq!(rendered.preview, "A walk in the hills.");
//! ```

mod error;
pub mod html;
pub mod image;
mod pipeline;
pub mod preview;
pub mod tree;

pub use error::RenderError;
pub use image::{ImageTagArgs, ImageTagRewriter, ImageUrls, TagMatch};
pub use pipeline::{MarkdownPipeline, PipelineConfig, Rendered};
pub use preview::PreviewOptions;
pub use tree::{Document, Element, Node};
