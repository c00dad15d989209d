//! Resource identification

use std::fmt;

/// The type of object a [`ResourceIdentifier`] addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A manifest or manifest list, referenced by tag or digest.
    Manifest,
    /// A content-addressed blob, referenced by digest.
    Blob,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Manifest => "manifest",
            ResourceKind::Blob => "blob",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniquely identifies a retrievable resource within the registry namespace.
///
/// This is the sole key type accepted by [`crate::Storage`] and
/// [`crate::Authorization`]. Identifiers are constructed per request from path
/// parameters and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceIdentifier {
    pub kind: ResourceKind,
    pub namespace: String,
    pub repository: String,
    pub reference: String,
}

impl ResourceIdentifier {
    pub fn manifest(
        namespace: impl Into<String>,
        repository: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            kind: ResourceKind::Manifest,
            namespace: namespace.into(),
            repository: repository.into(),
            reference: reference.into(),
        }
    }

    pub fn blob(
        namespace: impl Into<String>,
        repository: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            kind: ResourceKind::Blob,
            namespace: namespace.into(),
            repository: repository.into(),
            reference: reference.into(),
        }
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}:{}",
            self.kind, self.namespace, self.repository, self.reference
        )
    }
}
