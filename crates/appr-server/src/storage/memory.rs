//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{ResourceStream, Storage, StorageError};
use crate::resource::ResourceIdentifier;

/// Stores resources in a `HashMap` behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<ResourceIdentifier, Bytes>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored identifiers (useful for testing).
    pub fn keys(&self) -> Vec<ResourceIdentifier> {
        self.data.lock().unwrap().keys().cloned().collect()
    }

    /// Remove all stored resources (useful for testing).
    pub fn clear(&self) {
        self.data.lock().unwrap().clear();
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.data.lock().unwrap().len()
    }

    /// Whether the store holds no resources.
    pub fn is_empty(&self) -> bool {
        self.data.lock().unwrap().is_empty()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<ResourceIdentifier, Bytes>>, StorageError> {
        self.data
            .lock()
            .map_err(|_| StorageError::Backend("lock poisoned".into()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn stat(&self, id: &ResourceIdentifier) -> Result<u64, StorageError> {
        let data = self.lock()?;
        data.get(id)
            .map(|content| content.len() as u64)
            .ok_or(StorageError::NotFound)
    }

    async fn read(&self, id: &ResourceIdentifier) -> Result<ResourceStream, StorageError> {
        let data = self.lock()?;
        let content = data.get(id).cloned().ok_or(StorageError::NotFound)?;
        Ok(futures::stream::iter([Ok(content)]).boxed())
    }

    async fn write(&self, id: &ResourceIdentifier, content: Bytes) -> Result<(), StorageError> {
        let mut data = self.lock()?;
        data.insert(id.clone(), content);
        Ok(())
    }

    async fn delete(&self, id: &ResourceIdentifier) -> Result<(), StorageError> {
        let mut data = self.lock()?;
        data.remove(id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn read_all(storage: &MemoryStorage, id: &ResourceIdentifier) -> Vec<u8> {
        let stream = storage.read(id).await.unwrap();
        let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_basic_operations() {
        let storage = MemoryStorage::new();
        let id = ResourceIdentifier::blob("coreos", "etcd", "sha256:abc");
        let content = Bytes::from_static(b"hello, world");

        storage.write(&id, content.clone()).await.unwrap();

        assert_eq!(storage.stat(&id).await.unwrap(), content.len() as u64);
        assert_eq!(read_all(&storage, &id).await, content);

        storage.delete(&id).await.unwrap();
        assert!(matches!(
            storage.stat(&id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_read_missing_resource() {
        let storage = MemoryStorage::new();
        let id = ResourceIdentifier::blob("ns", "repo", "sha256:missing");

        assert!(matches!(
            storage.read(&id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_resource() {
        let storage = MemoryStorage::new();
        let id = ResourceIdentifier::manifest("ns", "repo", "v1");

        assert!(matches!(
            storage.delete(&id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_download_url_unsupported() {
        let storage = MemoryStorage::new();
        let id = ResourceIdentifier::blob("ns", "repo", "sha256:abc");

        assert!(matches!(
            storage.download_url(&id).await,
            Err(StorageError::Unsupported)
        ));
        assert!(matches!(
            storage.upload_url(&id).await,
            Err(StorageError::Unsupported)
        ));
    }

    #[tokio::test]
    async fn test_utilities() {
        let storage = MemoryStorage::new();
        assert!(storage.is_empty());

        let a = ResourceIdentifier::blob("ns", "repo", "sha256:a");
        let b = ResourceIdentifier::manifest("ns", "repo", "v1");
        storage.write(&a, Bytes::from_static(b"a")).await.unwrap();
        storage.write(&b, Bytes::from_static(b"b")).await.unwrap();

        assert_eq!(storage.len(), 2);
        assert!(storage.keys().contains(&a));

        storage.clear();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_manifest_and_blob_keys_are_distinct() {
        let storage = MemoryStorage::new();
        let manifest = ResourceIdentifier::manifest("ns", "repo", "same-ref");
        let blob = ResourceIdentifier::blob("ns", "repo", "same-ref");

        storage
            .write(&manifest, Bytes::from_static(b"manifest"))
            .await
            .unwrap();

        assert!(matches!(
            storage.stat(&blob).await,
            Err(StorageError::NotFound)
        ));
    }
}
