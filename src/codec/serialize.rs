use base64::{Engine, engine::general_purpose::STANDARD};
use snafu::{ResultExt, Snafu, ensure};
use tracing::debug;

use super::encoded::{Encoded, EncodedValue};
use crate::classify::{Encoding, EncodingError, TextExtensions, mime};
use crate::filesystem::{NodeId, Tree};
use crate::node::{FileData, FileValue, NodeValue};

/// Flattens the subtree under `node` into a path-keyed map.
///
/// Only leaves are emitted, in document order: empty directories as
/// [`EncodedValue::Directory`], files as their text or as base64. Keys are
/// full paths from the tree root.
pub fn serialize(
    tree: &Tree,
    node: NodeId,
    text_extensions: &TextExtensions,
) -> Result<Encoded, SerializeError> {
    ensure!(tree.contains(node), UnknownNodeSnafu { node });
    let mut serialized = Encoded::new();

    for current in tree.sub_nodes(node) {
        if tree.has_children(current) {
            continue;
        }

        let path = tree.get_path(current);
        let value = match tree.value(current) {
            NodeValue::Directory(_) => EncodedValue::Directory,
            NodeValue::File(file) => EncodedValue::Content(
                encode_file(&path, file, text_extensions).context(FileSnafu { path: &path })?,
            ),
        };
        serialized.insert(path, value);
    }

    debug!("Serialized {} entries", serialized.len());
    Ok(serialized)
}

fn encode_file(
    path: &str,
    file: &FileValue,
    text_extensions: &TextExtensions,
) -> Result<String, EncodingError> {
    let data = match (file.data(), file.encoding()) {
        (FileData::Text(hex), Some(Encoding::Hex)) => {
            FileData::Bytes(Encoding::Hex.encode(hex)?.into())
        }
        (data, _) => data.clone(),
    };

    let is_text = mime::is_text(mime::lookup(path))
        || file.encoding().is_some_and(|encoding| encoding.is_text())
        || text_extensions.is_text_extension(file.ext());

    match data {
        FileData::Text(text) => Ok(text),
        FileData::Bytes(bytes) if is_text => Encoding::Utf8.decode(&bytes),
        FileData::Bytes(bytes) => Ok(STANDARD.encode(bytes)),
    }
}

#[derive(Debug, Snafu)]
pub enum SerializeError {
    #[snafu(display("Node {} does not belong to this tree", node))]
    UnknownNodeError { node: NodeId },
    #[snafu(display("Cannot encode file at '{}'", path))]
    FileError {
        path: String,
        source: EncodingError,
    },
}
