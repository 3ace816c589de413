//! Node payloads: the validated value every directory or file in a tree
//! carries, and the factory functions that build them.

mod factory;
mod filename;
mod value;

pub use factory::{FileInput, create_directory, create_file};
pub use filename::{Filename, FilenameError};
pub use value::{DirectoryValue, FileData, FileValue, NodeKind, NodeValue, ValueError};
