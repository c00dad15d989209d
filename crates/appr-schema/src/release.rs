//! Releases and channels

use serde::{Deserialize, Serialize};

/// An immutable state of an application that has been assigned a version.
///
/// A `Release` is the user-friendly way to name a resolution target; the
/// client unpacks it into the `(namespace, repository, reference, platform)`
/// tuple driving the fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub namespace: String,
    pub repository: String,
    pub platform: String,
    pub version: String,
}

/// The head of a stream of releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    #[serde(flatten)]
    pub release: Release,
}
