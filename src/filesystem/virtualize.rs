use std::path::{Path, PathBuf};

use snafu::{OptionExt, ResultExt, Snafu};
use tracing::{debug, info};

use super::fs::Filesystem;
use super::tree::{NodeId, Tree, TreeError};
use crate::classify::{Encoding, TextExtensions, mime};
use crate::ext::BestEffortPathExt;
use crate::node::{FileValue, ValueError, create_directory, create_file};

/// Builds a tree from a real directory, or a single file node from a file.
///
/// Directories are walked with an explicit worklist; every filesystem call is
/// awaited before the next one starts and the first failure ends the walk.
pub async fn virtualize<F: Filesystem>(
    fs: &F,
    text_extensions: &TextExtensions,
    source: &Path,
) -> Result<Tree, VirtualizeError> {
    debug!("Virtualizing {}", source.best_effort_path_display());

    let is_directory = fs
        .is_directory(source)
        .await
        .context(StatSnafu { path: source })?;

    let tree = if is_directory {
        virtualize_directory(fs, text_extensions, source).await?
    } else {
        Tree::new(read_file_node(fs, text_extensions, source).await?)
    };

    info!(
        "Virtualized {} nodes from {}",
        tree.node_count(),
        source.best_effort_path_display()
    );
    Ok(tree)
}

async fn virtualize_directory<F: Filesystem>(
    fs: &F,
    text_extensions: &TextExtensions,
    source: &Path,
) -> Result<Tree, VirtualizeError> {
    let root = create_directory(base_name(source)?).context(NodeSnafu { path: source })?;
    let mut tree = Tree::new(root);
    let mut pending: Vec<(NodeId, PathBuf)> = vec![(tree.root(), source.to_path_buf())];

    while let Some((directory, directory_path)) = pending.pop() {
        let names = fs
            .list_directory(&directory_path)
            .await
            .context(ListSnafu {
                path: &directory_path,
            })?;
        debug!(
            "Visiting {} with {} entries",
            directory_path.display(),
            names.len()
        );

        for name in names {
            let child_path = directory_path.join(&name);
            let is_directory = fs
                .is_directory(&child_path)
                .await
                .context(StatSnafu { path: &child_path })?;

            if is_directory {
                let value = create_directory(&name).context(NodeSnafu { path: &child_path })?;
                let child = tree.create(value);
                tree.append_child(directory, child).context(TreeSnafu)?;
                pending.push((child, child_path));
            } else {
                let value = read_file_node(fs, text_extensions, &child_path).await?;
                let child = tree.create(value);
                tree.append_child(directory, child).context(TreeSnafu)?;
            }
        }
    }

    Ok(tree)
}

async fn read_file_node<F: Filesystem>(
    fs: &F,
    text_extensions: &TextExtensions,
    source: &Path,
) -> Result<FileValue, VirtualizeError> {
    let name = base_name(source)?;
    let is_text = mime::is_text(mime::lookup(source))
        || text_extensions.is_text_extension(mime::extension_of(name));

    let bytes = fs
        .read_file(source)
        .await
        .context(ReadSnafu { path: source })?;
    debug!(
        "Read {} bytes from {} as {}",
        bytes.len(),
        source.display(),
        if is_text { "text" } else { "binary" }
    );

    let value = if is_text {
        let text = String::from_utf8_lossy(&bytes).into_owned();
        create_file(name, text, Some(Encoding::Utf8))
    } else {
        create_file(name, bytes, None)
    };
    value.context(NodeSnafu { path: source })
}

fn base_name(path: &Path) -> Result<&str, VirtualizeError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .context(InvalidSourceSnafu { path })
}

#[derive(Debug, Snafu)]
pub enum VirtualizeError {
    #[snafu(display("Failed to stat {}", path.best_effort_path_display()))]
    StatError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to list directory {}", path.best_effort_path_display()))]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read file {}", path.best_effort_path_display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Path {} has no usable file name", path.display()))]
    InvalidSourceError { path: PathBuf },
    #[snafu(display("Cannot create a node for {}", path.best_effort_path_display()))]
    NodeError { path: PathBuf, source: ValueError },
    #[snafu(display("Cannot attach node to the tree"))]
    TreeError { source: TreeError },
}
