//! Stateless classification of encodings, MIME types and data shapes, plus
//! the registry of extensions forced to be text.

pub mod buffer;
mod encoding;
pub mod mime;
mod text_extensions;

pub use encoding::{ENCODING_NAMES, Encoding, EncodingError, is_encoding, is_text_encoding};
pub use text_extensions::{RegistryError, TextExtensions};
