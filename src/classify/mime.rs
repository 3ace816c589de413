use std::path::Path;

use super::encoding::is_text_encoding;

/// Reported for anything the lookup table does not know.
pub const DEFAULT_MIME: &str = "application/octet-stream";

const TEXT_MIME_TYPES: [&str; 2] = ["application/javascript", "application/json"];

/// Looks up a MIME type from the extension of `path`.
pub fn lookup(path: impl AsRef<Path>) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_MIME)
}

/// True for textual MIME types and for the names of text encodings.
pub fn is_text(subject: &str) -> bool {
    subject.starts_with("text/")
        || subject.ends_with("xml")
        || TEXT_MIME_TYPES.contains(&subject)
        || is_text_encoding(subject)
}

/// Extension of a filename, dot included.
///
/// A leading dot marks a hidden file rather than an extension.
pub fn extension_of(filename: &str) -> &str {
    match filename.rfind('.') {
        None | Some(0) => "",
        Some(index) => &filename[index..],
    }
}
