//! In-memory directory/file trees and their synchronization with a real
//! filesystem.
//!
//! [`Tree`] is an arena of nodes where each node is either a directory (that
//! can contain other nodes) or a file. [`virtualize`] reads a real directory
//! into a tree and [`actualize`] writes a tree back out.

mod actualize;
mod fs;
mod paths;
mod tree;
mod virtualize;

pub use actualize::{ActualizeError, actualize};
pub use fs::{CompioFs, Filesystem};
pub use paths::SEPARATOR;
pub use tree::{NodeId, Tree, TreeError};
pub use virtualize::{VirtualizeError, virtualize};
