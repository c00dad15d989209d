//! # appr-client
//!
//! Client for the appr application registry. A [`RegistrySession`] resolves a
//! `(namespace, repository, reference, platform)` tuple into one open byte
//! stream per blob of the matching release:
//!
//! 1. fetch the manifest list named by the reference,
//! 2. select the entry for the requested platform,
//! 3. fetch the manifest the entry points at by digest,
//! 4. open one stream per blob, in the manifest's declared order.
//!
//! The pipeline is all-or-nothing: the first failure at any stage aborts the
//! whole fetch, closing any streams opened so far.
//!
//! ```rust,no_run
//! use appr_client::{RegistryEndpoint, RegistrySession};
//!
//! # async fn example() -> Result<(), appr_client::ClientError> {
//! let endpoint = RegistryEndpoint::new("https://registry.example.com", "v0")?;
//! let session = RegistrySession::new("my-token", endpoint);
//!
//! let blobs = session.fetch("coreos", "etcd", "v3.2", "helm").await?;
//! for blob in blobs {
//!     let digest = blob.digest().clone();
//!     let bytes = blob.bytes().await?;
//!     println!("{digest}: {} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod error;
pub mod session;

pub use endpoint::RegistryEndpoint;
pub use error::ClientError;
pub use session::{BlobStream, RegistrySession};
