//! Filesystem-backed storage
//!
//! Directory structure:
//! ```text
//! root/
//! └── namespace/
//!     └── repository/
//!         ├── manifests/
//!         │   ├── v3.2
//!         │   └── sha256:...
//!         └── blobs/
//!             └── sha256:...
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{ResourceStream, Storage, StorageError};
use crate::resource::{ResourceIdentifier, ResourceKind};

pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create a filesystem storage rooted at `root`, creating the directory
    /// if it does not exist.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn resource_path(&self, id: &ResourceIdentifier) -> Result<PathBuf, StorageError> {
        for part in [&id.namespace, &id.repository, &id.reference] {
            validate_path_part(part)?;
        }

        let kind_dir = match id.kind {
            ResourceKind::Manifest => "manifests",
            ResourceKind::Blob => "blobs",
        };

        Ok(self
            .root
            .join(&id.namespace)
            .join(&id.repository)
            .join(kind_dir)
            .join(&id.reference))
    }
}

/// Reject identifier parts that would escape the storage root.
fn validate_path_part(part: &str) -> Result<(), StorageError> {
    if part.is_empty() {
        return Err(StorageError::InvalidKey("empty path segment".into()));
    }
    if part == "." || part == ".." {
        return Err(StorageError::InvalidKey(format!(
            "path segment {part:?} not allowed"
        )));
    }
    if part.contains('/') || part.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "path segment {part:?} contains a separator"
        )));
    }
    Ok(())
}

fn map_io(err: std::io::Error) -> StorageError {
    if err.kind() == ErrorKind::NotFound {
        StorageError::NotFound
    } else {
        StorageError::Io(err)
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn stat(&self, id: &ResourceIdentifier) -> Result<u64, StorageError> {
        let path = self.resource_path(id)?;
        let metadata = fs::metadata(&path).await.map_err(map_io)?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound);
        }
        Ok(metadata.len())
    }

    async fn read(&self, id: &ResourceIdentifier) -> Result<ResourceStream, StorageError> {
        let path = self.resource_path(id)?;
        // Reads are per-file and unsynchronized; a concurrent delete of the
        // same identifier surfaces as NotFound without affecting other reads.
        let content = fs::read(&path).await.map_err(map_io)?;
        Ok(futures::stream::iter([Ok(Bytes::from(content))]).boxed())
    }

    async fn write(&self, id: &ResourceIdentifier, content: Bytes) -> Result<(), StorageError> {
        let path = self.resource_path(id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &content).await?;
        Ok(())
    }

    async fn delete(&self, id: &ResourceIdentifier) -> Result<(), StorageError> {
        let path = self.resource_path(id)?;
        fs::remove_file(&path).await.map_err(map_io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    async fn read_all(storage: &FsStorage, id: &ResourceIdentifier) -> Vec<u8> {
        let stream = storage.read(id).await.unwrap();
        let chunks: Vec<Bytes> = stream.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_write_read_stat_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).await.unwrap();
        let id = ResourceIdentifier::blob("coreos", "etcd", "sha256:abc123");
        let content = Bytes::from_static(b"etcd release bytes");

        storage.write(&id, content.clone()).await.unwrap();

        assert_eq!(storage.stat(&id).await.unwrap(), content.len() as u64);
        assert_eq!(read_all(&storage, &id).await, content);

        storage.delete(&id).await.unwrap();
        assert!(matches!(
            storage.read(&id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_missing_resource_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).await.unwrap();
        let id = ResourceIdentifier::manifest("ns", "repo", "v1");

        assert!(matches!(
            storage.stat(&id).await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            storage.delete(&id).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_rejects_traversal_segments() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).await.unwrap();
        let id = ResourceIdentifier::blob("..", "repo", "sha256:abc");

        assert!(matches!(
            storage.read(&id).await,
            Err(StorageError::InvalidKey(_))
        ));

        let id = ResourceIdentifier::blob("ns", "a/b", "sha256:abc");
        assert!(matches!(
            storage.stat(&id).await,
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_racing_read_leaves_other_resources_intact() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).await.unwrap();
        let doomed = ResourceIdentifier::blob("ns", "repo", "sha256:doomed");
        let survivor = ResourceIdentifier::blob("ns", "repo", "sha256:survivor");

        storage.write(&doomed, Bytes::from_static(b"d")).await.unwrap();
        storage
            .write(&survivor, Bytes::from_static(b"s"))
            .await
            .unwrap();

        storage.delete(&doomed).await.unwrap();

        assert!(matches!(
            storage.read(&doomed).await,
            Err(StorageError::NotFound)
        ));
        assert_eq!(read_all(&storage, &survivor).await, b"s");
    }

    #[tokio::test]
    async fn test_download_url_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path()).await.unwrap();
        let id = ResourceIdentifier::blob("ns", "repo", "sha256:abc");

        assert!(matches!(
            storage.download_url(&id).await,
            Err(StorageError::Unsupported)
        ));
    }
}
