//! Resource storage abstraction
//!
//! The [`Storage`] trait is the contract a backend must satisfy to serve
//! registry resources. Backends are keyed solely by [`ResourceIdentifier`]
//! and perform no access checks; authorization happens before the store is
//! ever consulted.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::resource::ResourceIdentifier;

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

/// Byte chunks produced when reading a resource.
pub type ResourceStream = BoxStream<'static, std::io::Result<Bytes>>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("resource could not be found")]
    NotFound,

    /// Returned from an optional method a backend does not implement. This is
    /// a negotiation signal, not a failure; it is never surfaced to clients.
    #[error("method is not supported")]
    Unsupported,

    #[error("invalid resource key: {0}")]
    InvalidKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Storage and retrieval of registry resources.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Size in bytes of the resource, or [`StorageError::NotFound`] if it is
    /// not present.
    async fn stat(&self, id: &ResourceIdentifier) -> Result<u64, StorageError>;

    /// Open the resource for reading.
    async fn read(&self, id: &ResourceIdentifier) -> Result<ResourceStream, StorageError>;

    /// Store the resource, replacing any previous content.
    async fn write(&self, id: &ResourceIdentifier, content: Bytes) -> Result<(), StorageError>;

    /// Remove the resource, or [`StorageError::NotFound`] if it is not
    /// present.
    async fn delete(&self, id: &ResourceIdentifier) -> Result<(), StorageError>;

    /// URL the client can be redirected to for a direct download.
    ///
    /// Optional: backends that cannot produce direct URLs return
    /// [`StorageError::Unsupported`].
    async fn download_url(&self, _id: &ResourceIdentifier) -> Result<String, StorageError> {
        Err(StorageError::Unsupported)
    }

    /// URL the client can be redirected to for a direct upload.
    ///
    /// Same optionality contract as [`Storage::download_url`].
    async fn upload_url(&self, _id: &ResourceIdentifier) -> Result<String, StorageError> {
        Err(StorageError::Unsupported)
    }
}
