use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use snafu::{OptionExt, ResultExt, Snafu, ensure};
use tracing::{debug, warn};

use super::encoded::{Encoded, EncodedValue};
use crate::classify::{Encoding, mime};
use crate::filesystem::{NodeId, SEPARATOR, Tree, TreeError};
use crate::node::{NodeValue, ValueError, create_directory, create_file};

/// Rebuilds a tree from a path-keyed map, processing entries in map order.
///
/// Text is recognized by MIME type only; registered text extensions play no
/// part here. The root is the node for the first top-level segment seen;
/// entries under any other top-level segment end up detached from it.
pub fn deserialize(encoded: &Encoded) -> Result<Tree, DeserializeError> {
    let mut tree: Option<Tree> = None;
    let mut directories: HashMap<String, NodeId> = HashMap::new();

    for (path, value) in encoded {
        ensure!(!path.is_empty(), EmptyPathSnafu);
        let (segments, name) = match path.rsplit_once(SEPARATOR) {
            Some((ancestors, name)) => (ancestors.split(SEPARATOR).collect::<Vec<_>>(), name),
            None => (Vec::new(), path.as_str()),
        };
        let own = entry_value(path, name, value)?;

        let mut parent: Option<NodeId> = None;
        let mut prefix = String::new();

        for (index, segment) in segments.iter().enumerate() {
            if index > 0 {
                prefix.push(SEPARATOR);
            }
            prefix.push_str(segment);

            let directory = match directories.get(&prefix) {
                Some(existing) => *existing,
                None => {
                    let value = create_directory(segment).context(NodeSnafu { path })?;
                    let created = match (tree.as_mut(), parent) {
                        (Some(tree), Some(parent)) => {
                            let created = tree.create(value);
                            tree.append_child(parent, created).context(TreeSnafu { path })?;
                            created
                        }
                        (Some(tree), None) => {
                            warn!("Top-level directory '{}' is detached from the root", prefix);
                            tree.create(value)
                        }
                        (None, _) => {
                            let created = Tree::new(value);
                            let root = created.root();
                            tree = Some(created);
                            root
                        }
                    };
                    directories.insert(prefix.clone(), created);
                    created
                }
            };
            parent = Some(directory);
        }

        if own.is_directory() && directories.contains_key(path) {
            debug!("Directory '{}' already materialized", path);
            continue;
        }

        let is_directory = own.is_directory();
        let node = match (tree.as_mut(), parent) {
            (Some(tree), Some(parent)) => {
                let node = tree.create(own);
                tree.append_child(parent, node).context(TreeSnafu { path })?;
                node
            }
            (Some(tree), None) => {
                warn!("Root-level entry '{}' is detached from the root", path);
                tree.create(own)
            }
            (None, _) => {
                let created = Tree::new(own);
                let root = created.root();
                tree = Some(created);
                root
            }
        };
        if is_directory {
            directories.insert(path.clone(), node);
        }
    }

    let tree = tree.context(EmptyEncodingSnafu)?;
    debug!(
        "Deserialized {} entries into {} nodes",
        encoded.len(),
        tree.node_count()
    );
    Ok(tree)
}

fn entry_value(
    path: &str,
    name: &str,
    value: &EncodedValue,
) -> Result<NodeValue, DeserializeError> {
    let node = match value {
        EncodedValue::Directory => create_directory(name).map(NodeValue::from),
        EncodedValue::Content(content) if mime::is_text(mime::lookup(path)) => {
            create_file(name, content.as_str(), Some(Encoding::Utf8)).map(NodeValue::from)
        }
        EncodedValue::Content(content) => {
            let bytes = STANDARD.decode(content).context(Base64Snafu { path })?;
            create_file(name, bytes, None).map(NodeValue::from)
        }
    };
    node.context(NodeSnafu { path })
}

#[derive(Debug, Snafu)]
pub enum DeserializeError {
    #[snafu(display("Nothing to deserialize"))]
    EmptyEncodingError,
    #[snafu(display("Encoded path is empty"))]
    EmptyPathError,
    #[snafu(display("Content at '{}' is not valid base64", path))]
    Base64Error {
        path: String,
        source: base64::DecodeError,
    },
    #[snafu(display("Invalid node at '{}'", path))]
    NodeError { path: String, source: ValueError },
    #[snafu(display("Cannot attach node at '{}'", path))]
    TreeError { path: String, source: TreeError },
}
