//! Error-to-status mapping for the HTTP surface

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::auth::AuthError;
use crate::storage::StorageError;

/// Errors surfaced to registry clients.
///
/// The mapping to status codes is total: not-found maps to 404, an
/// authorization failure to 401, and everything else to 500. Responses carry
/// no body detail.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Storage(StorageError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Auth(AuthError::Unauthorized) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_is_total() {
        assert_eq!(
            ApiError::from(StorageError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AuthError::Unauthorized).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(StorageError::Backend("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // Unsupported is handled internally by the delivery strategy; if it
        // ever escapes, it still maps to a server error.
        assert_eq!(
            ApiError::from(StorageError::Unsupported).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
