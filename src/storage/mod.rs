//! Local output directory for downloaded files

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

/// Metadata returned after a file has been written
#[derive(Debug, Clone)]
pub struct SavedFile {
    pub filename: String,
    /// Absolute path of the written file
    pub path: PathBuf,
    pub size: usize,
}

/// Flat directory that every download is written into.
///
/// Writes that target the same path are serialized; the last writer wins.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    root: PathBuf,
    locks: Arc<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>>,
}

impl DownloadDir {
    /// Create the directory if absent and resolve it to an absolute path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let create_err = |source: std::io::Error| StorageError::CreateDir {
            path: path.to_path_buf(),
            source,
        };

        std::fs::create_dir_all(path).map_err(create_err)?;
        let root = std::path::absolute(path).map_err(create_err)?;

        tracing::debug!(path = %root.display(), "Download directory ready");

        Ok(Self {
            root,
            locks: Arc::default(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` to `filename` inside the directory, replacing any existing file
    pub async fn write(&self, filename: &str, data: &[u8]) -> Result<SavedFile> {
        let path = self.resolve(filename)?;
        let lease = self.lease(&path);

        let written = {
            let _guard = lease.lock.lock().await;
            tokio::fs::write(&path, data).await
        };
        drop(lease);

        written.map_err(|source| StorageError::WriteFailed {
            path: path.clone(),
            source,
        })?;

        Ok(SavedFile {
            filename: filename.to_string(),
            path,
            size: data.len(),
        })
    }

    /// Join `filename` onto the root, refusing anything that is not a plain file name
    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let invalid = filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains(['/', '\\', '\0']);
        if invalid {
            return Err(StorageError::InvalidFilename(filename.to_string()));
        }

        Ok(self.root.join(filename))
    }

    fn lease(&self, path: &Path) -> PathLease<'_> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        let lock = locks.entry(path.to_path_buf()).or_default().clone();
        PathLease {
            dir: self,
            path: path.to_path_buf(),
            lock,
        }
    }
}

/// Handle on one path's write lock. The map entry is removed when the last
/// lease drops, including when a write future is cancelled mid-flight.
struct PathLease<'a> {
    dir: &'a DownloadDir,
    path: PathBuf,
    lock: Arc<AsyncMutex<()>>,
}

impl Drop for PathLease<'_> {
    fn drop(&mut self) {
        let mut locks = self.dir.locks.lock().unwrap_or_else(|e| e.into_inner());
        // one handle in the map, one here
        if locks
            .get(&self.path)
            .is_some_and(|lock| Arc::strong_count(lock) == 2)
        {
            locks.remove(&self.path);
        }
    }
}
