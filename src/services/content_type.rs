//! Content-Type lookup by file extension.

use std::path::Path;

/// Used when the extension is missing or unknown.
pub const FALLBACK: &str = "text/plain";

/// Resolve the MIME type stored alongside an object.
pub fn resolve(path: impl AsRef<Path>) -> &'static str {
    mime_guess::from_path(path).first_raw().unwrap_or(FALLBACK)
}
