use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info};

use super::fs::Filesystem;
use super::tree::{NodeId, Tree};
use crate::ext::BestEffortPathExt;
use crate::node::{NodeValue, ValueError};

/// Writes `node` and its descendants under `target`, which must be an
/// existing directory.
///
/// Nodes are written one at a time in document order, each at its full tree
/// path below `target`. The first failure aborts the rest and nothing already
/// written is rolled back.
pub async fn actualize<F: Filesystem>(
    fs: &F,
    tree: &Tree,
    node: NodeId,
    target: &Path,
) -> Result<(), ActualizeError> {
    ensure!(tree.contains(node), UnknownNodeSnafu { node });
    let is_directory = fs
        .is_directory(target)
        .await
        .context(StatSnafu { path: target })?;
    ensure!(is_directory, NotADirectorySnafu { path: target });

    let nodes = tree.sub_nodes(node);
    debug!(
        "Actualizing {} nodes into {}",
        nodes.len(),
        target.best_effort_path_display()
    );

    for current in &nodes {
        let path = target.join(tree.get_path(*current));

        match tree.value(*current) {
            NodeValue::Directory(_) => {
                debug!("Creating directory {}", path.display());
                fs.create_directory(&path)
                    .await
                    .context(CreateDirectorySnafu { path: &path })?;
            }
            NodeValue::File(file) => {
                let contents = file.to_bytes().context(EncodeSnafu { path: &path })?;
                debug!("Writing {} bytes to {}", contents.len(), path.display());
                fs.write_file(&path, contents)
                    .await
                    .context(WriteSnafu { path: &path })?;
            }
        }
    }

    info!(
        "Actualized {} nodes into {}",
        nodes.len(),
        target.best_effort_path_display()
    );
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum ActualizeError {
    #[snafu(display("Node {} does not belong to this tree", node))]
    UnknownNodeError { node: NodeId },
    #[snafu(display("Failed to stat target {}", path.best_effort_path_display()))]
    StatError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "Target {} must be a path to an existing directory",
        path.best_effort_path_display()
    ))]
    NotADirectoryError { path: PathBuf },
    #[snafu(display("Failed to create directory {}", path.best_effort_path_display()))]
    CreateDirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write file {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Cannot encode contents for {}", path.display()))]
    EncodeError { path: PathBuf, source: ValueError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Encoding, TextExtensions};
    use crate::filesystem::fs::CompioFs;
    use crate::filesystem::fs::memory::{Entry, MemoryFs};
    use crate::filesystem::virtualize::virtualize;
    use crate::node::{create_directory, create_file};
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn sample_tree() -> Tree {
        let mut tree = Tree::new(create_directory("site").unwrap());
        let root = tree.root();
        let assets = tree.create(create_directory("assets").unwrap());
        let logo = tree.create(create_file("logo.png", vec![0x89u8, b'P', 0xff], None).unwrap());
        let index = tree.create(create_file("index.txt", "hi", None).unwrap());
        let hex = tree.create(create_file("raw.bin", "00ff", Some(Encoding::Hex)).unwrap());
        tree.append_child(root, assets).unwrap();
        tree.append_child(assets, logo).unwrap();
        tree.append_child(root, index).unwrap();
        tree.append_child(root, hex).unwrap();
        tree
    }

    #[compio::test]
    async fn writes_tree_below_target() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = sample_tree();

        actualize(&CompioFs, &tree, tree.root(), temp_dir.path())
            .await
            .unwrap();

        let site = temp_dir.path().join("site");
        assert!(site.join("assets").is_dir());
        assert_eq!(
            std_fs::read(site.join("assets/logo.png")).unwrap(),
            vec![0x89, b'P', 0xff]
        );
        assert_eq!(std_fs::read_to_string(site.join("index.txt")).unwrap(), "hi");
        assert_eq!(std_fs::read(site.join("raw.bin")).unwrap(), vec![0x00, 0xff]);
    }

    #[compio::test]
    async fn writes_a_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = Tree::new(create_file("hello.txt", "Hello, World!", None).unwrap());

        actualize(&CompioFs, &tree, tree.root(), temp_dir.path())
            .await
            .unwrap();

        assert_eq!(
            std_fs::read_to_string(temp_dir.path().join("hello.txt")).unwrap(),
            "Hello, World!"
        );
    }

    #[compio::test]
    async fn rejects_missing_and_file_targets() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("hello.txt");
        std_fs::write(&file, "hello").unwrap();
        let tree = sample_tree();

        let missing = actualize(&CompioFs, &tree, tree.root(), Path::new("")).await;
        assert!(matches!(missing, Err(ActualizeError::StatError { .. })));

        let not_dir = actualize(&CompioFs, &tree, tree.root(), &file).await;
        assert!(matches!(
            not_dir,
            Err(ActualizeError::NotADirectoryError { .. })
        ));
    }

    #[compio::test]
    async fn existing_directory_fails_without_cleanup() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std_fs::create_dir_all(temp_dir.path().join("site/assets")).unwrap();
        let tree = sample_tree();

        let result = actualize(&CompioFs, &tree, tree.root(), temp_dir.path()).await;

        assert!(matches!(
            result,
            Err(ActualizeError::CreateDirectoryError { .. })
        ));
        assert!(temp_dir.path().join("site/assets").is_dir());
    }

    #[compio::test]
    async fn writes_in_document_order_and_stops_at_first_failure() {
        let fs = MemoryFs::new()
            .with_directory("/out")
            .failing_on("/out/site/index.txt");
        let tree = sample_tree();

        let result = actualize(&fs, &tree, tree.root(), Path::new("/out")).await;

        assert!(matches!(result, Err(ActualizeError::WriteError { .. })));
        assert_eq!(
            fs.calls(),
            vec![
                "stat /out",
                "mkdir /out/site",
                "mkdir /out/site/assets",
                "write /out/site/assets/logo.png",
                "write /out/site/index.txt",
            ]
        );
        assert_eq!(
            fs.entry("/out/site/assets/logo.png"),
            Some(Entry::File(vec![0x89, b'P', 0xff]))
        );
        assert_eq!(fs.entry("/out/site/raw.bin"), None);
    }

    #[compio::test]
    async fn rejects_foreign_node_before_touching_the_target() {
        let fs = MemoryFs::new().with_directory("/out");
        let tree = sample_tree();
        let mut other = tree.clone();
        let foreign = other.create(create_directory("extra").unwrap());

        let result = actualize(&fs, &tree, foreign, Path::new("/out")).await;

        assert!(matches!(
            result,
            Err(ActualizeError::UnknownNodeError { .. })
        ));
        assert!(fs.calls().is_empty());
    }

    #[compio::test]
    async fn actualizes_a_subtree_at_its_full_path() {
        let fs = MemoryFs::new()
            .with_directory("/out")
            .with_directory("/out/site");
        let tree = sample_tree();
        let assets = tree.at_path(tree.root(), "site/assets").unwrap();

        actualize(&fs, &tree, assets, Path::new("/out")).await.unwrap();

        assert_eq!(fs.entry("/out/site/assets"), Some(Entry::Directory));
        assert!(fs.entry("/out/site/assets/logo.png").is_some());
        assert_eq!(fs.entry("/out/site/index.txt"), None);
    }

    #[compio::test]
    async fn virtualize_actualize_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("target");
        std_fs::create_dir(&target).unwrap();
        let tree = sample_tree();
        let text = TextExtensions::new();

        actualize(&CompioFs, &tree, tree.root(), &target).await.unwrap();
        let again = virtualize(&CompioFs, &text, &target.join("site"))
            .await
            .unwrap();

        let slugs = again
            .sub_nodes(again.root())
            .into_iter()
            .map(|node| again.get_path(node))
            .collect::<Vec<_>>();
        assert_eq!(
            slugs,
            vec![
                "site",
                "site/assets",
                "site/assets/logo.png",
                "site/index.txt",
                "site/raw.bin",
            ]
        );
    }
}
