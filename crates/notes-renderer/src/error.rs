//! Error types for the rendering pipeline.

/// Error raised while constructing a [`MarkdownPipeline`](crate::MarkdownPipeline).
///
/// Rendering itself never fails: malformed markdown and malformed image tags
/// degrade to literal text.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The storage base URL was not configured or is blank.
    #[error("storage base URL is required to render image tags")]
    MissingStorageBaseUrl,
}
