//! Manifests and manifest lists
//!
//! A manifest is the ordered list of blobs composing one platform-specific
//! release. A manifest list indexes manifests by platform so a single tag can
//! serve multiple platforms without duplicating blob metadata.

use serde::{Deserialize, Serialize};

use crate::digest::Sha256Digest;
use crate::error::{NoMatchingPlatform, SchemaError};

/// MIME type used for content-type negotiation for a [`ManifestList`].
pub const MANIFEST_LIST_MEDIA_TYPE: &str = "application/vnd.appr.manifest.list.v0+json";

/// MIME type used for content-type negotiation for a [`Manifest`].
pub const MANIFEST_MEDIA_TYPE: &str = "application/vnd.appr.manifest.v0+json";

/// The sole schema version this crate understands.
pub const SCHEMA_VERSION: i32 = 1;

/// Metadata describing one application artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// The MIME type of the referenced object.
    pub media_type: String,
    /// The size in bytes of the object.
    pub size: u64,
    /// The SHA-256 hash of the object.
    pub digest: Sha256Digest,
    /// Optional list of URLs from which the content may also be fetched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

/// The ordered list of blobs that compose a particular release of an
/// application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub schema_version: i32,
    pub media_type: String,
    pub blobs: Vec<Blob>,
}

impl Manifest {
    /// Decode a manifest, rejecting unknown schema versions before full
    /// decoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        check_schema_version(bytes)?;
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the manifest as JSON.
    pub fn to_vec(&self) -> Result<Vec<u8>, SchemaError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// The unique metadata that differentiates entries of a [`ManifestList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
}

/// A reference to a [`Manifest`] embedded in a [`ManifestList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestListEntry {
    pub schema_version: i32,
    pub media_type: String,
    pub size: u64,
    pub digest: Sha256Digest,
    pub platform: Platform,
}

/// A list of manifests for the same release, differentiated by platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestList {
    pub schema_version: i32,
    pub media_type: String,
    pub manifests: Vec<ManifestListEntry>,
}

impl ManifestList {
    /// Decode a manifest list, rejecting unknown schema versions before full
    /// decoding.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SchemaError> {
        check_schema_version(bytes)?;
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encode the manifest list as JSON.
    pub fn to_vec(&self) -> Result<Vec<u8>, SchemaError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Find the entry for `platform`.
    ///
    /// Returns the first match in document order. Duplicate platform names are
    /// tolerated; use [`ManifestList::duplicate_platforms`] to detect them.
    pub fn find_manifest(&self, platform: &str) -> Result<&ManifestListEntry, NoMatchingPlatform> {
        self.manifests
            .iter()
            .find(|entry| entry.platform.name == platform)
            .ok_or_else(|| NoMatchingPlatform {
                platform: platform.to_string(),
            })
    }

    /// Platform names that appear more than once, in first-occurrence order.
    pub fn duplicate_platforms(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();

        for entry in &self.manifests {
            let name = entry.platform.name.as_str();
            if seen.contains(&name) {
                if !duplicates.contains(&name) {
                    duplicates.push(name);
                }
            } else {
                seen.push(name);
            }
        }

        duplicates
    }
}

/// Only the `schemaVersion` field, probed before full decoding.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SchemaVersionProbe {
    schema_version: i32,
}

fn check_schema_version(bytes: &[u8]) -> Result<(), SchemaError> {
    let probe: SchemaVersionProbe = serde_json::from_slice(bytes)?;
    if probe.schema_version != SCHEMA_VERSION {
        return Err(SchemaError::UnsupportedSchemaVersion(probe.schema_version));
    }
    Ok(())
}
