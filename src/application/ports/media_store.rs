use std::io;

use bytes::Bytes;

use crate::domain::StoragePath;

/// Byte storage for uploaded media and synthesized artifacts. Backed by the
/// local filesystem in production; an in-memory adapter exists for tests.
#[async_trait::async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<(), MediaStoreError>;

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, MediaStoreError>;

    async fn delete(&self, path: &StoragePath) -> Result<(), MediaStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
