use std::path::Path;

use crate::classify::{RegistryError, TextExtensions};
use crate::codec::{self, DeserializeError, Encoded, SerializeError};
use crate::config::VfsConfig;
use crate::filesystem::{
    self, ActualizeError, CompioFs, Filesystem, NodeId, Tree, VirtualizeError,
};

/// Entry point tying the codec and filesystem sync to one text-extension
/// registry.
#[derive(Debug, Clone, Default)]
pub struct Vfs {
    text_extensions: TextExtensions,
}

impl Vfs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &VfsConfig) -> Result<Self, RegistryError> {
        Ok(Self {
            text_extensions: TextExtensions::try_from(config.text_extensions.as_slice())?,
        })
    }

    pub fn register_text(&mut self, ext: &str) -> Result<(), RegistryError> {
        self.text_extensions.register(ext)
    }

    pub fn is_text_extension(&self, ext: &str) -> bool {
        self.text_extensions.is_text_extension(ext)
    }

    pub fn text_extensions(&self) -> &TextExtensions {
        &self.text_extensions
    }

    pub fn serialize(&self, tree: &Tree) -> Result<Encoded, SerializeError> {
        self.serialize_node(tree, tree.root())
    }

    pub fn serialize_node(&self, tree: &Tree, node: NodeId) -> Result<Encoded, SerializeError> {
        codec::serialize(tree, node, &self.text_extensions)
    }

    pub fn deserialize(&self, encoded: &Encoded) -> Result<Tree, DeserializeError> {
        codec::deserialize(encoded)
    }

    pub async fn virtualize(&self, source: &Path) -> Result<Tree, VirtualizeError> {
        self.virtualize_with(&CompioFs, source).await
    }

    pub async fn virtualize_with<F: Filesystem>(
        &self,
        fs: &F,
        source: &Path,
    ) -> Result<Tree, VirtualizeError> {
        filesystem::virtualize(fs, &self.text_extensions, source).await
    }

    pub async fn actualize(
        &self,
        tree: &Tree,
        node: NodeId,
        target: &Path,
    ) -> Result<(), ActualizeError> {
        self.actualize_with(&CompioFs, tree, node, target).await
    }

    pub async fn actualize_with<F: Filesystem>(
        &self,
        fs: &F,
        tree: &Tree,
        node: NodeId,
        target: &Path,
    ) -> Result<(), ActualizeError> {
        filesystem::actualize(fs, tree, node, target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{EncodedValue, encoded};
    use std::fs;
    use tempfile::TempDir;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    fn fixture(temp_dir: &TempDir) -> std::path::PathBuf {
        let source = temp_dir.path().join("source");
        fs::create_dir_all(source.join("depth-0/depth-1/depth-2")).unwrap();
        fs::write(source.join("hello.txt"), "Hello, World!").unwrap();
        fs::write(source.join("depth-0/hello.js"), "'use strict'\n").unwrap();
        fs::write(source.join("depth-0/depth-1/hello.mmon"), "<p>mmon</p>").unwrap();
        fs::write(source.join("depth-0/depth-1/bin.png"), PNG_HEADER).unwrap();
        source
    }

    #[test]
    fn registry_is_per_instance() {
        let mut vfs = Vfs::new();
        vfs.register_text("mmon").unwrap();

        assert!(vfs.is_text_extension(".mmon"));
        assert!(!Vfs::new().is_text_extension(".mmon"));
        assert!(vfs.register_text("").is_err());
    }

    #[test]
    fn builds_from_config() {
        let config = VfsConfig {
            text_extensions: vec!["mmon".to_string(), ".tmpl".to_string()],
        };
        let vfs = Vfs::from_config(&config).unwrap();

        assert_eq!(vfs.text_extensions().len(), 2);
        assert!(vfs.is_text_extension(".tmpl"));
    }

    #[compio::test]
    async fn serializes_virtualized_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = fixture(&temp_dir);
        let mut vfs = Vfs::new();
        vfs.register_text("mmon").unwrap();

        let tree = vfs.virtualize(&source).await.unwrap();
        let serialized = vfs.serialize(&tree).unwrap();

        assert_eq!(
            serialized,
            encoded([
                ("source/depth-0/depth-1/bin.png", EncodedValue::from("iVBORw0KGgo=")),
                ("source/depth-0/depth-1/depth-2", EncodedValue::Directory),
                ("source/depth-0/depth-1/hello.mmon", EncodedValue::from("<p>mmon</p>")),
                ("source/depth-0/hello.js", EncodedValue::from("'use strict'\n")),
                ("source/hello.txt", EncodedValue::from("Hello, World!")),
            ])
        );
    }

    #[compio::test]
    async fn copy_preserves_serialized_form() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = fixture(&temp_dir);
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let mut vfs = Vfs::new();
        vfs.register_text("mmon").unwrap();

        let tree = vfs.virtualize(&source).await.unwrap();
        vfs.actualize(&tree, tree.root(), &target).await.unwrap();
        let copied = vfs.virtualize(&target.join("source")).await.unwrap();

        assert_eq!(
            vfs.serialize(&copied).unwrap(),
            vfs.serialize(&tree).unwrap()
        );
        assert_eq!(
            fs::read(target.join("source/depth-0/depth-1/bin.png")).unwrap(),
            PNG_HEADER
        );
    }

    #[compio::test]
    async fn materializes_deserialized_map() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vfs = Vfs::new();
        let map = encoded([
            ("site/index.txt", EncodedValue::from("hi")),
            ("site/img/logo.png", EncodedValue::from("iVBORw0KGgo=")),
            ("site/empty", EncodedValue::Directory),
        ]);

        let tree = vfs.deserialize(&map).unwrap();
        vfs.actualize(&tree, tree.root(), temp_dir.path())
            .await
            .unwrap();

        let site = temp_dir.path().join("site");
        assert_eq!(fs::read_to_string(site.join("index.txt")).unwrap(), "hi");
        assert_eq!(fs::read(site.join("img/logo.png")).unwrap(), PNG_HEADER);
        assert!(site.join("empty").is_dir());
    }
}
