use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{MediaStore, MediaStoreError};
use crate::domain::StoragePath;

/// Filesystem-backed media store rooted at a single directory. Paths are
/// validated single segments, so everything lands directly under the root.
pub struct LocalMediaStore {
    store: LocalFileSystem,
}

impl LocalMediaStore {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, MediaStoreError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;

        let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
            MediaStoreError::WriteFailed(format!("store root {}: {}", root.display(), e))
        })?;

        Ok(Self { store })
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, path: &StoragePath, data: Bytes) -> Result<(), MediaStoreError> {
        let location = object_store::path::Path::from(path.as_str());

        self.store
            .put(&location, PutPayload::from(data))
            .await
            .map_err(|e| MediaStoreError::WriteFailed(e.to_string()))?;

        Ok(())
    }

    async fn fetch(&self, path: &StoragePath) -> Result<Bytes, MediaStoreError> {
        let location = object_store::path::Path::from(path.as_str());

        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                MediaStoreError::NotFound(path.as_str().to_string())
            }
            other => MediaStoreError::ReadFailed(other.to_string()),
        })?;

        result
            .bytes()
            .await
            .map_err(|e| MediaStoreError::ReadFailed(e.to_string()))
    }

    async fn delete(&self, path: &StoragePath) -> Result<(), MediaStoreError> {
        let location = object_store::path::Path::from(path.as_str());

        self.store.delete(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                MediaStoreError::NotFound(path.as_str().to_string())
            }
            other => MediaStoreError::DeleteFailed(other.to_string()),
        })
    }
}
