//! Client error types

use appr_schema::{NoMatchingPlatform, SchemaError};
use thiserror::Error;

/// Errors produced while resolving and fetching a release.
///
/// The session never retries: the first failure at any pipeline stage aborts
/// the whole fetch and is returned to the caller unchanged.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("resource could not be found")]
    NotFound,

    #[error("resource access is unauthorized")]
    Unauthorized,

    #[error("unexpected status code {0}")]
    Protocol(reqwest::StatusCode),

    #[error(transparent)]
    NoMatchingPlatform(#[from] NoMatchingPlatform),

    #[error("malformed response body: {0}")]
    Decode(#[from] SchemaError),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("invalid registry endpoint: {0}")]
    Endpoint(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
