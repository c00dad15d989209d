//! # appr-server
//!
//! Server side of the appr application registry:
//! - [`ResourceIdentifier`]: the flat key addressing any retrievable object
//! - [`Storage`]: pluggable resource store (in-memory and filesystem backends
//!   included), with optional direct-URL generation
//! - [`Authorization`]: pluggable access authority ([`NoopAuth`] and
//!   [`TokenAuth`] included)
//! - [`api::router`]: the HTTP surface, gating reads behind authorization and
//!   deciding per request whether to redirect the client to storage or stream
//!   bytes through the serving process

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod resource;
pub mod storage;

pub use api::{AppState, router};
pub use auth::{AuthError, Authorization, NoopAuth, TokenAuth};
pub use config::ServerConfig;
pub use error::ApiError;
pub use resource::{ResourceIdentifier, ResourceKind};
pub use storage::{FsStorage, MemoryStorage, ResourceStream, Storage, StorageError};
