//! Inline image tags: `[img alt="..." width=N height=N link="..."]path[/img]`.
//!
//! Markdown has no syntax for this, so the tag is recognized after parsing,
//! on text nodes the markdown grammar has already classified as literal.
//! Each tag becomes a link to the original image wrapping a lazily loaded
//! preview rendition:
//!
//! ```html
//! <a href="{base}/{path}"><img src="{base}/{stem}_preview.{ext}" alt="" loading="lazy"></a>
//! ```
//!
//! - [`scan`] finds tags in a string.
//! - [`ImageTagArgs`] parses the attribute section.
//! - [`ImageUrls`] derives original and preview URLs.
//! - [`ImageTagRewriter`] splices the result into the document tree.

mod args;
mod rewriter;
mod scanner;
mod url;

pub use args::ImageTagArgs;
pub use rewriter::{ImageTagRewriter, Spliced};
pub use scanner::{TagMatch, has_image_tag, scan, strip_image_tags};
pub use url::{ImageUrls, PREVIEW_SUFFIX, preview_path};
