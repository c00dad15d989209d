//! Error types for schema parsing and lookups

use thiserror::Error;

/// Errors produced when validating a content address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("digest must start with 'sha256:'")]
    MissingPrefix,

    #[error("SHA-256 digest must be 64 hex characters, got {0}")]
    InvalidLength(usize),

    #[error("digest must contain only hexadecimal characters")]
    InvalidHex,
}

/// Errors produced when decoding a manifest or manifest list.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unsupported schema version {0}")]
    UnsupportedSchemaVersion(i32),

    #[error("invalid digest: {0}")]
    Digest(#[from] DigestError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// A manifest list contains no entry for the requested platform.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no matching manifest in manifest list for platform {platform:?}")]
pub struct NoMatchingPlatform {
    pub platform: String,
}
