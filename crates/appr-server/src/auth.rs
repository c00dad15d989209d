//! Access authorization
//!
//! The [`Authorization`] trait answers read/write permission questions for a
//! credential against a [`ResourceIdentifier`]. An absent `Authorization`
//! header reaches implementations as the empty credential; [`NoopAuth`]
//! accepts it, a real authority rejects it.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

use crate::resource::ResourceIdentifier;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("resource access is unauthorized")]
    Unauthorized,
}

/// Authorizes access to resources.
#[async_trait]
pub trait Authorization: Send + Sync {
    async fn read_permission(
        &self,
        credential: &str,
        id: &ResourceIdentifier,
    ) -> Result<(), AuthError>;

    async fn write_permission(
        &self,
        credential: &str,
        id: &ResourceIdentifier,
    ) -> Result<(), AuthError>;
}

/// Blindly authorizes any request to access a resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuth;

#[async_trait]
impl Authorization for NoopAuth {
    async fn read_permission(&self, _: &str, _: &ResourceIdentifier) -> Result<(), AuthError> {
        Ok(())
    }

    async fn write_permission(&self, _: &str, _: &ResourceIdentifier) -> Result<(), AuthError> {
        Ok(())
    }
}

/// Authorizes requests carrying one of a fixed set of bearer tokens.
#[derive(Debug, Default)]
pub struct TokenAuth {
    tokens: HashSet<String>,
}

impl TokenAuth {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().collect(),
        }
    }

    fn check(&self, credential: &str) -> Result<(), AuthError> {
        if self.tokens.contains(credential) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }
}

#[async_trait]
impl Authorization for TokenAuth {
    async fn read_permission(
        &self,
        credential: &str,
        _: &ResourceIdentifier,
    ) -> Result<(), AuthError> {
        self.check(credential)
    }

    async fn write_permission(
        &self,
        credential: &str,
        _: &ResourceIdentifier,
    ) -> Result<(), AuthError> {
        self.check(credential)
    }
}
