//! Local filesystem blob storage
//!
//! Every write goes to a fresh UUID-named file directly under the storage
//! root, so paths are never shared between records. Size variants produced
//! by the thumbnail worker sit next to the original as `<path>_<size>`.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

/// Blob storage rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the storage root if it does not exist yet
    ///
    /// An already existing directory is not an error, including when another
    /// request created it concurrently.
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Pick a new, unused path under the storage root
    pub fn generate_path(&self) -> PathBuf {
        self.root.join(Uuid::new_v4().to_string())
    }

    /// Write `data` to `path`, replacing any previous content
    pub async fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, data).await?;
        debug!("Wrote {} bytes to '{}'", data.len(), path.display());
        Ok(())
    }

    /// Read the full content stored at `path`
    pub async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let data = tokio::fs::read(path).await?;
        debug!("Read {} bytes from '{}'", data.len(), path.display());
        Ok(data)
    }

    /// Path of a stored file or of one of its size variants
    pub fn variant_path(local_path: &str, size: Option<&str>) -> PathBuf {
        match size {
            Some(size) => PathBuf::from(format!("{}_{}", local_path, size)),
            None => PathBuf::from(local_path),
        }
    }
}
