//! Storage URL derivation for image tags.

use crate::RenderError;

/// Suffix inserted before the file extension of preview renditions.
pub const PREVIEW_SUFFIX: &str = "_preview";

/// Derives original and preview URLs for image paths under a storage base URL.
///
/// # Example
///
/// ```
/// use notes_renderer::image::ImageUrls;
///
/// let urls = ImageUrls::new("https://cdn.example/").unwrap();
/// assert_eq!(urls.original("dir/photo.png"), "https://cdn.example/dir/photo.png");
/// assert_eq!(urls.preview("dir/photo.png"), "https://cdn.example/dir/photo_preview.png");
/// ```
#[derive(Debug, Clone)]
pub struct ImageUrls {
    base_url: String,
}

impl ImageUrls {
    /// Create a URL deriver for the given storage base URL.
    ///
    /// Trailing slashes are trimmed from the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingStorageBaseUrl`] if the base URL is blank.
    pub fn new(base_url: &str) -> Result<Self, RenderError> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(RenderError::MissingStorageBaseUrl);
        }
        Ok(Self {
            base_url: base_url.to_owned(),
        })
    }

    /// The normalized storage base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full-resolution URL: `base/path`.
    #[must_use]
    pub fn original(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Preview rendition URL, see [`preview_path`].
    #[must_use]
    pub fn preview(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url,
            preview_path(path.trim_start_matches('/'))
        )
    }
}

/// Insert [`PREVIEW_SUFFIX`] before the extension of the final path segment.
///
/// When the final segment has no extension (no `.`, a leading-dot name such
/// as `.env`, or a trailing `.`), the suffix is appended to the end.
///
/// ```
/// use notes_renderer::image::preview_path;
///
/// assert_eq!(preview_path("dir/photo.png"), "dir/photo_preview.png");
/// assert_eq!(preview_path("archive.tar.gz"), "archive.tar_preview.gz");
/// assert_eq!(preview_path("dir/photo"), "dir/photo_preview");
/// ```
#[must_use]
pub fn preview_path(path: &str) -> String {
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    let segment = &path[segment_start..];

    match segment.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < segment.len() => {
            let split = segment_start + dot;
            format!("{}{PREVIEW_SUFFIX}{}", &path[..split], &path[split..])
        }
        _ => format!("{path}{PREVIEW_SUFFIX}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_base_url_rejected() {
        assert!(matches!(
            ImageUrls::new(""),
            Err(RenderError::MissingStorageBaseUrl)
        ));
        assert!(matches!(
            ImageUrls::new("  "),
            Err(RenderError::MissingStorageBaseUrl)
        ));
        assert!(matches!(
            ImageUrls::new("/"),
            Err(RenderError::MissingStorageBaseUrl)
        ));
    }

    #[test]
    fn test_original_url() {
        let urls = ImageUrls::new("https://cdn.example").unwrap();
        assert_eq!(urls.original("x.jpg"), "https://cdn.example/x.jpg");
    }

    #[test]
    fn test_preview_url() {
        let urls = ImageUrls::new("https://cdn.example").unwrap();
        assert_eq!(urls.preview("x.jpg"), "https://cdn.example/x_preview.jpg");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let urls = ImageUrls::new("https://cdn.example//").unwrap();
        assert_eq!(urls.base_url(), "https://cdn.example");
        assert_eq!(urls.original("x.jpg"), "https://cdn.example/x.jpg");
    }

    #[test]
    fn test_leading_slash_in_path() {
        let urls = ImageUrls::new("https://cdn.example").unwrap();
        assert_eq!(urls.original("/x.jpg"), "https://cdn.example/x.jpg");
        assert_eq!(urls.preview("/x.jpg"), "https://cdn.example/x_preview.jpg");
    }

    #[test]
    fn test_preview_path_nested() {
        assert_eq!(preview_path("dir/photo.png"), "dir/photo_preview.png");
    }

    #[test]
    fn test_preview_path_no_extension() {
        assert_eq!(preview_path("dir/photo"), "dir/photo_preview");
        assert_eq!(preview_path("photo"), "photo_preview");
    }

    #[test]
    fn test_preview_path_dot_in_directory() {
        assert_eq!(preview_path("v1.2/photo"), "v1.2/photo_preview");
        assert_eq!(preview_path("v1.2/photo.jpg"), "v1.2/photo_preview.jpg");
    }

    #[test]
    fn test_preview_path_dotfile() {
        assert_eq!(preview_path("dir/.hidden"), "dir/.hidden_preview");
    }

    #[test]
    fn test_preview_path_trailing_dot() {
        assert_eq!(preview_path("photo."), "photo._preview");
    }

    #[test]
    fn test_preview_path_multiple_dots() {
        assert_eq!(preview_path("a.b.c.webp"), "a.b.c_preview.webp");
    }

    #[test]
    fn test_preview_base_url_dots_untouched() {
        let urls = ImageUrls::new("https://cdn.example").unwrap();
        assert_eq!(urls.preview("photo"), "https://cdn.example/photo_preview");
    }
}
