//! Markdown rendering pipeline: parse, rewrite image tags, serialize.

use pulldown_cmark::{Options, Parser};

use crate::RenderError;
use crate::html::to_html;
use crate::image::{ImageTagRewriter, ImageUrls};
use crate::preview::{PreviewOptions, extract_preview};
use crate::tree::{Document, build_document};

/// Pipeline configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Storage base URL that image tag paths are resolved against. Required.
    pub storage_base_url: Option<String>,
    /// Enable GFM tables and task lists.
    pub gfm: bool,
    /// Enable `~~strikethrough~~`.
    pub strikethrough: bool,
    /// Preview extraction limits.
    pub preview: PreviewOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            storage_base_url: None,
            gfm: false,
            strikethrough: true,
            preview: PreviewOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Configuration with the given storage base URL and default options.
    #[must_use]
    pub fn with_storage_base_url(base_url: impl Into<String>) -> Self {
        Self {
            storage_base_url: Some(base_url.into()),
            ..Self::default()
        }
    }
}

/// Result of [`MarkdownPipeline::render_with_preview`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rendered {
    /// Rendered HTML.
    pub html: String,
    /// Plain-text preview.
    pub preview: String,
}

/// Markdown to HTML pipeline with inline image tag support.
///
/// Construction validates configuration; rendering never fails. The pipeline
/// holds no mutable state, so one instance can serve concurrent renders.
///
/// # Example
///
/// ```
/// use notes_renderer::{MarkdownPipeline, PipelineConfig};
///
/// let pipeline = MarkdownPipeline::new(
///     PipelineConfig::with_storage_base_url("https://cdn.example"),
/// ).unwrap();
///
/// let html = pipeline.render("a [img]x.jpg[/img] b");
/// assert_eq!(
///     html,
///     r#"<p>a <a href="https://cdn.example/x.jpg"><img alt="" loading="lazy" src="https://cdn.example/x_preview.jpg"></a> b</p>"#
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownPipeline {
    rewriter: ImageTagRewriter,
    options: Options,
    preview: PreviewOptions,
}

impl MarkdownPipeline {
    /// Create a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingStorageBaseUrl`] if no storage base URL
    /// is configured.
    pub fn new(config: PipelineConfig) -> Result<Self, RenderError> {
        let base_url = config
            .storage_base_url
            .as_deref()
            .ok_or(RenderError::MissingStorageBaseUrl)?;
        let urls = ImageUrls::new(base_url)?;

        tracing::debug!(
            base_url = urls.base_url(),
            gfm = config.gfm,
            strikethrough = config.strikethrough,
            "Markdown pipeline configured"
        );

        Ok(Self {
            rewriter: ImageTagRewriter::new(urls),
            options: parser_options(config.gfm, config.strikethrough),
            preview: config.preview,
        })
    }

    /// Parser options in effect.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        self.options
    }

    /// Parse markdown into a document tree without rewriting image tags.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> Document {
        build_document(Parser::new_ext(markdown, self.options))
    }

    /// Render markdown to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let mut document = self.parse(markdown);
        self.rewrite(&mut document);
        to_html(&document)
    }

    /// Render markdown to HTML and extract a plain-text preview.
    ///
    /// The preview is taken from the tree before image tags are rewritten,
    /// with the tags removed.
    #[must_use]
    pub fn render_with_preview(&self, markdown: &str) -> Rendered {
        let mut document = self.parse(markdown);
        let preview = extract_preview(&document, &self.preview);
        self.rewrite(&mut document);
        Rendered {
            html: to_html(&document),
            preview,
        }
    }

    /// Extract only the plain-text preview.
    #[must_use]
    pub fn preview(&self, markdown: &str) -> String {
        extract_preview(&self.parse(markdown), &self.preview)
    }

    fn rewrite(&self, document: &mut Document) {
        let count = self.rewriter.rewrite_document(document);
        if count > 0 {
            tracing::debug!(count, "Rewrote image tags");
        }
    }
}

/// Parser options for the configured markdown dialect.
fn parser_options(gfm: bool, strikethrough: bool) -> Options {
    let mut options = Options::empty();
    if strikethrough {
        options |= Options::ENABLE_STRIKETHROUGH;
    }
    if gfm {
        options |= Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS;
    }
    options
}
