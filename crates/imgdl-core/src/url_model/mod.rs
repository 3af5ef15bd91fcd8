//! URL modeling and filename derivation.
//!
//! Derives safe local filenames from URL paths, Content-Disposition headers
//! and MIME types, sanitized for any desktop filesystem.

mod content_disposition;
mod path;
mod percent;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use path::{
    basename_from_url, extension_from_content_type, has_recognizable_extension, last_segment,
    url_from_background_image, FALLBACK_BASENAME,
};
pub use percent::{percent_decode, DecodeError};
pub use sanitize::{sanitize_filename, FALLBACK_FILENAME, NAME_MAX};

/// Filename hint taken from a URL before any enrichment: the raw last
/// segment, or `"image"` when the URL ends in `/`.
///
/// # Examples
///
/// - `filename_hint("https://example.com/archive.png")` → `"archive.png"`
/// - `filename_hint("https://example.com/")` → `"image"`
pub fn filename_hint(url: &str) -> String {
    let segment = last_segment(url);
    if segment.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        segment.to_string()
    }
}
