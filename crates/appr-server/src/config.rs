//! Server configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(String);

/// Which storage backend to serve from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Fs,
}

/// Which access authority to gate requests with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthBackend {
    Noop,
    Token,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Storage backend selection
    pub storage: StorageBackend,

    /// Root directory for the filesystem backend
    pub storage_root: PathBuf,

    /// Access authority selection
    pub auth: AuthBackend,

    /// Accepted bearer tokens for the token authority
    pub auth_tokens: Vec<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage = match std::env::var("STORAGE")
            .unwrap_or_else(|_| "memory".to_string())
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "fs" => StorageBackend::Fs,
            other => {
                return Err(ConfigError(format!("invalid STORAGE value {other:?}")));
            }
        };

        let auth = match std::env::var("AUTH")
            .unwrap_or_else(|_| "noop".to_string())
            .as_str()
        {
            "noop" => AuthBackend::Noop,
            "token" => AuthBackend::Token,
            other => return Err(ConfigError(format!("invalid AUTH value {other:?}"))),
        };

        let auth_tokens: Vec<String> = std::env::var("AUTH_TOKENS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();

        if auth == AuthBackend::Token && auth_tokens.is_empty() {
            return Err(ConfigError(
                "AUTH=token requires a non-empty AUTH_TOKENS list".to_string(),
            ));
        }

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| ConfigError("invalid PORT value".to_string()))?,
            storage,
            storage_root: std::env::var("STORAGE_ROOT")
                .unwrap_or_else(|_| "./registry-data".to_string())
                .into(),
            auth,
            auth_tokens,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            storage: StorageBackend::Memory,
            storage_root: "./registry-data".into(),
            auth: AuthBackend::Noop,
            auth_tokens: Vec::new(),
        }
    }
}
