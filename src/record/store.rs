use std::path::Path;

use async_trait::async_trait;

use crate::error::{AppError, AppResult, SinkError};

/// Storage primitives the sink and loader rely on.
///
/// Each call is expected to be atomic enough for a single writer; the sink
/// never issues overlapping calls.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `SinkError::CreateDirectory` when the directory cannot be created.
    async fn ensure_dir(&self, path: &Path) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns `SinkError::WriteLog` when the file cannot be written.
    async fn write_full(&self, path: &Path, contents: &[u8]) -> AppResult<()>;

    /// Returns `Ok(None)` when the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::ReadLog` for any other read failure.
    async fn read_full(&self, path: &Path) -> AppResult<Option<Vec<u8>>>;
}

/// Filesystem-backed store on `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLogStore;

#[async_trait]
impl LogStore for FsLogStore {
    async fn ensure_dir(&self, path: &Path) -> AppResult<()> {
        tokio::fs::create_dir_all(path).await.map_err(|err| {
            AppError::sink(SinkError::CreateDirectory {
                path: path.to_path_buf(),
                source: err,
            })
        })
    }

    async fn write_full(&self, path: &Path, contents: &[u8]) -> AppResult<()> {
        tokio::fs::write(path, contents).await.map_err(|err| {
            AppError::sink(SinkError::WriteLog {
                path: path.to_path_buf(),
                source: err,
            })
        })
    }

    async fn read_full(&self, path: &Path) -> AppResult<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::sink(SinkError::ReadLog {
                path: path.to_path_buf(),
                source: err,
            })),
        }
    }
}
