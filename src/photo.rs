//! Student photo persistence.
//!
//! Photos are never overwritten: the destination is checked before any
//! request is made, and the file is opened with `create_new` so a file that
//! appears in the meantime is still left alone.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::transport::TransportError;

/// Errors from fetching and saving the student photo.
#[derive(Debug, Error)]
pub enum PhotoError {
    /// No active session.
    #[error("no active session; authenticate first")]
    NoSession,

    /// The destination already exists and is left untouched.
    #[error("refusing to overwrite existing file {path}")]
    AlreadyExists {
        /// The destination path.
        path: PathBuf,
    },

    /// Fetching the photo failed.
    #[error("failed to fetch photo: {0}")]
    Transport(#[from] TransportError),

    /// Checking or writing the destination failed.
    #[error("IO error writing photo to {path}: {source}")]
    Io {
        /// The destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl PhotoError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Fails with [`PhotoError::AlreadyExists`] when something is at `path`.
pub(crate) async fn ensure_absent(path: &Path) -> Result<(), PhotoError> {
    let exists = tokio::fs::try_exists(path)
        .await
        .map_err(|e| PhotoError::io(path, e))?;
    if exists {
        return Err(PhotoError::AlreadyExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Writes `bytes` to a new file at `path` and syncs it to disk.
///
/// A partially written file is removed before the error is returned.
pub(crate) async fn write_new_file(path: &Path, bytes: &[u8]) -> Result<(), PhotoError> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(|e| {
            if e.kind() == ErrorKind::AlreadyExists {
                PhotoError::AlreadyExists {
                    path: path.to_path_buf(),
                }
            } else {
                PhotoError::io(path, e)
            }
        })?;

    let written = async {
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await
    }
    .await;

    if let Err(e) = written {
        debug!(path = %path.display(), "cleaning up partial photo after error");
        drop(file);
        let _ = tokio::fs::remove_file(path).await;
        return Err(PhotoError::io(path, e));
    }

    debug!(path = %path.display(), bytes = bytes.len(), "photo saved");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_ensure_absent_passes_for_fresh_path() {
        let dir = TempDir::new().unwrap();
        assert!(ensure_absent(&dir.path().join("photo.jpg")).await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_absent_rejects_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"old").unwrap();
        let result = ensure_absent(&path).await;
        assert!(matches!(result, Err(PhotoError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_write_new_file_is_binary_safe() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        let bytes = [0xff, 0xd8, 0x00, 0x0d, 0x0a, 0xff, 0xd9];
        write_new_file(&path, &bytes).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_write_new_file_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"keep me").unwrap();
        let result = write_new_file(&path, b"new").await;
        assert!(matches!(result, Err(PhotoError::AlreadyExists { .. })));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
    }

    #[tokio::test]
    async fn test_write_new_file_missing_parent_is_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("photo.jpg");
        let result = write_new_file(&path, b"x").await;
        assert!(matches!(result, Err(PhotoError::Io { .. })));
    }
}
