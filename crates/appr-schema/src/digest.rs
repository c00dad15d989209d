//! SHA-256 content addresses

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::error::DigestError;

const PREFIX: &str = "sha256:";
const HEX_LEN: usize = 64;

/// A SHA-256 content address in the canonical `sha256:<64 hex chars>` form.
///
/// Two byte sequences with the same address are byte-identical by convention.
/// Resolution trusts the backend and never recomputes digests of retrieved
/// bytes; [`Sha256Digest::matches`] is available for callers that want that
/// check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Parse and validate a digest string.
    pub fn parse(s: &str) -> Result<Self, DigestError> {
        let hex = s.strip_prefix(PREFIX).ok_or(DigestError::MissingPrefix)?;

        if hex.len() != HEX_LEN {
            return Err(DigestError::InvalidLength(hex.len()));
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestError::InvalidHex);
        }

        Ok(Self(s.to_string()))
    }

    /// Compute the digest of a byte sequence.
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(format!("{PREFIX}{:x}", hasher.finalize()))
    }

    /// Recompute the digest of `content` and compare it to this address.
    pub fn matches(&self, content: &[u8]) -> bool {
        Self::of(content).0.eq_ignore_ascii_case(&self.0)
    }

    /// The full `sha256:`-prefixed string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hex portion without the algorithm prefix.
    pub fn hex(&self) -> &str {
        &self.0[PREFIX.len()..]
    }
}

impl FromStr for Sha256Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = DigestError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
