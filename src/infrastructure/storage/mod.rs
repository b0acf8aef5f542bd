//! Object storage capability used by the job pipeline.

pub mod s3;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0}")]
    DownloadFailed(String),

    #[error("{0}")]
    UploadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Transfers whole files between the local filesystem and a bucket.
///
/// Implementations are shared by every concurrent job and must not keep
/// per-job state.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Fetch `key` into `local_path`, creating or truncating the file.
    async fn download(&self, key: &str, local_path: &Path) -> StorageResult<()>;

    /// Store the file at `local_path` under `key`.
    async fn upload(&self, local_path: &Path, key: &str) -> StorageResult<()>;
}
