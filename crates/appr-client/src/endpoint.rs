//! Registry endpoint location

use reqwest::Url;

use appr_schema::Sha256Digest;

use crate::error::{ClientError, Result};

/// The location where an appr registry API can be found.
#[derive(Debug, Clone)]
pub struct RegistryEndpoint {
    base: Url,
    version: String,
}

impl RegistryEndpoint {
    /// Create and validate a registry endpoint.
    pub fn new(base_url: &str, version: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base_url).map_err(|err| ClientError::Endpoint(err.to_string()))?;

        if base.cannot_be_a_base() {
            return Err(ClientError::Endpoint(format!(
                "{base_url:?} cannot serve as a base URL"
            )));
        }

        Ok(Self {
            base,
            version: version.into(),
        })
    }

    /// URL addressing a manifest or manifest list by tag or digest.
    pub fn manifest_url(&self, namespace: &str, repository: &str, reference: &str) -> Result<Url> {
        self.join(&[&self.version, namespace, repository, "manifests", reference])
    }

    /// URL addressing a blob by digest.
    pub fn blob_url(&self, namespace: &str, repository: &str, digest: &Sha256Digest) -> Result<Url> {
        self.join(&[
            &self.version,
            namespace,
            repository,
            "blobs",
            digest.as_str(),
        ])
    }

    fn join(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Endpoint("endpoint cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_base_url() {
        assert!(matches!(
            RegistryEndpoint::new("not a url", "v0"),
            Err(ClientError::Endpoint(_))
        ));
        assert!(matches!(
            RegistryEndpoint::new("mailto:someone@example.com", "v0"),
            Err(ClientError::Endpoint(_))
        ));
    }

    #[test]
    fn test_manifest_url() {
        let endpoint = RegistryEndpoint::new("https://registry.example.com", "v0").unwrap();
        let url = endpoint.manifest_url("coreos", "etcd", "v3.2").unwrap();

        assert_eq!(
            url.as_str(),
            "https://registry.example.com/v0/coreos/etcd/manifests/v3.2"
        );
    }

    #[test]
    fn test_blob_url() {
        let endpoint = RegistryEndpoint::new("https://registry.example.com", "v0").unwrap();
        let digest = Sha256Digest::of(b"blob");
        let url = endpoint.blob_url("coreos", "etcd", &digest).unwrap();

        assert_eq!(
            url.as_str(),
            format!("https://registry.example.com/v0/coreos/etcd/blobs/{digest}")
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let endpoint = RegistryEndpoint::new("https://example.com/registry/", "v0").unwrap();
        let url = endpoint.manifest_url("coreos", "etcd", "v3.2").unwrap();

        assert_eq!(
            url.as_str(),
            "https://example.com/registry/v0/coreos/etcd/manifests/v3.2"
        );
    }
}
