#![allow(clippy::enum_variant_names)]

//! Virtual directory trees: build them from a real filesystem, write them
//! back out, and flatten them to a path-keyed map and back.

pub mod classify;
pub mod codec;
pub mod config;
pub mod ext;
pub mod filesystem;
pub mod node;
mod vfs;

pub use classify::{Encoding, TextExtensions};
pub use codec::{Encoded, EncodedValue, deserialize, serialize};
pub use config::VfsConfig;
pub use filesystem::{CompioFs, Filesystem, NodeId, Tree, actualize, virtualize};
pub use node::{NodeKind, NodeValue, create_directory, create_file};
pub use vfs::Vfs;
