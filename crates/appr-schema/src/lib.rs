//! # appr-schema
//!
//! Schema types for the appr application registry:
//! - Content addresses (`sha256:`-prefixed SHA-256 digests)
//! - Blob descriptors and platform-specific manifests
//! - Manifest lists multiplexing one release across platforms
//! - Releases and channels naming resolution targets
//!
//! These are pure value types: freely copyable, no I/O, no shared mutable
//! state. The client and server crates build on them.

pub mod digest;
pub mod error;
pub mod manifest;
pub mod release;

pub use digest::Sha256Digest;
pub use error::{DigestError, NoMatchingPlatform, SchemaError};
pub use manifest::{
    Blob, MANIFEST_LIST_MEDIA_TYPE, MANIFEST_MEDIA_TYPE, Manifest, ManifestList,
    ManifestListEntry, Platform, SCHEMA_VERSION,
};
pub use release::{Channel, Release};
