use std::io;
use std::path::Path;

use compio::fs;
use tracing::trace;

/// The filesystem operations virtualize and actualize are built on.
///
/// Callers await each operation before starting the next, so an
/// implementation never sees two calls in flight for one traversal.
// compio drives futures on a single thread, so no `Send` bound is wanted
#[allow(async_fn_in_trait)]
pub trait Filesystem {
    async fn is_directory(&self, path: &Path) -> io::Result<bool>;
    async fn list_directory(&self, path: &Path) -> io::Result<Vec<String>>;
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    async fn write_file(&self, path: &Path, contents: Vec<u8>) -> io::Result<()>;
    async fn create_directory(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem, through compio.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompioFs;

impl Filesystem for CompioFs {
    async fn is_directory(&self, path: &Path) -> io::Result<bool> {
        let metadata = fs::metadata(path).await?;
        Ok(metadata.is_dir())
    }

    /// Entry names sorted by name.
    async fn list_directory(&self, path: &Path) -> io::Result<Vec<String>> {
        // compio exposes no async directory listing
        let mut names = std::fs::read_dir(path)?
            .map(|entry| {
                entry?.file_name().into_string().map_err(|name| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("entry name {name:?} is not valid UTF-8"),
                    )
                })
            })
            .collect::<io::Result<Vec<_>>>()?;
        names.sort();
        trace!("Listed {} entries in {}", names.len(), path.display());
        Ok(names)
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    async fn write_file(&self, path: &Path, contents: Vec<u8>) -> io::Result<()> {
        fs::write(path, contents).await.0
    }

    async fn create_directory(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path).await
    }
}
