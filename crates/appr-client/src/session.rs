//! Registry resolution session

use bytes::Bytes;
use futures_util::Stream;
use reqwest::{Client, Response, StatusCode, header};
use tracing::debug;

use appr_schema::{
    MANIFEST_LIST_MEDIA_TYPE, MANIFEST_MEDIA_TYPE, Manifest, ManifestList, Release, Sha256Digest,
};

use crate::endpoint::RegistryEndpoint;
use crate::error::{ClientError, Result};

/// The state used to engage with a registry.
pub struct RegistrySession {
    endpoint: RegistryEndpoint,
    credential: String,
    http: Client,
}

impl RegistrySession {
    /// Create a session against `endpoint` with a default HTTP client.
    pub fn new(credential: impl Into<String>, endpoint: RegistryEndpoint) -> Self {
        Self::with_client(credential, endpoint, Client::new())
    }

    /// Create a session with a preconfigured HTTP client.
    pub fn with_client(
        credential: impl Into<String>,
        endpoint: RegistryEndpoint,
        http: Client,
    ) -> Self {
        Self {
            endpoint,
            credential: credential.into(),
            http,
        }
    }

    /// Alias for calling [`RegistrySession::fetch`] with the parameters of a
    /// [`Release`].
    pub async fn fetch_release(&self, release: &Release) -> Result<Vec<BlobStream>> {
        self.fetch(
            &release.namespace,
            &release.repository,
            &release.version,
            &release.platform,
        )
        .await
    }

    /// Resolve `(namespace, repository, reference, platform)` into one open
    /// byte stream per blob of the matching release, in the manifest's
    /// declared order.
    ///
    /// Stages run strictly in sequence; the first failure aborts the fetch
    /// and propagates unchanged.
    pub async fn fetch(
        &self,
        namespace: &str,
        repository: &str,
        reference: &str,
        platform: &str,
    ) -> Result<Vec<BlobStream>> {
        let list = self
            .fetch_manifest_list(namespace, repository, reference)
            .await?;

        let entry = list.find_manifest(platform)?;

        let manifest = self
            .fetch_manifest(namespace, repository, &entry.digest)
            .await?;

        self.fetch_blobs(namespace, repository, &manifest).await
    }

    /// Fetch the manifest list named by a tag or digest reference.
    pub async fn fetch_manifest_list(
        &self,
        namespace: &str,
        repository: &str,
        reference: &str,
    ) -> Result<ManifestList> {
        let body = self
            .manifest_request(namespace, repository, reference, MANIFEST_LIST_MEDIA_TYPE)
            .await?;
        Ok(ManifestList::from_slice(&body)?)
    }

    /// Fetch a single manifest by digest.
    pub async fn fetch_manifest(
        &self,
        namespace: &str,
        repository: &str,
        digest: &Sha256Digest,
    ) -> Result<Manifest> {
        let body = self
            .manifest_request(namespace, repository, digest.as_str(), MANIFEST_MEDIA_TYPE)
            .await?;
        Ok(Manifest::from_slice(&body)?)
    }

    /// Open one stream per blob of `manifest`, in declared order.
    ///
    /// All-or-nothing: if any blob request fails, streams opened so far are
    /// dropped (closing their connections) and the error is returned.
    pub async fn fetch_blobs(
        &self,
        namespace: &str,
        repository: &str,
        manifest: &Manifest,
    ) -> Result<Vec<BlobStream>> {
        let mut streams = Vec::with_capacity(manifest.blobs.len());

        for blob in &manifest.blobs {
            let response = self.blob_request(namespace, repository, &blob.digest).await?;
            streams.push(BlobStream {
                digest: blob.digest.clone(),
                response,
            });
        }

        Ok(streams)
    }

    async fn manifest_request(
        &self,
        namespace: &str,
        repository: &str,
        reference: &str,
        accept: &'static str,
    ) -> Result<Bytes> {
        let url = self.endpoint.manifest_url(namespace, repository, reference)?;
        debug!(%url, accept, "requesting manifest");

        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, self.bearer())
            .header(header::ACCEPT, accept)
            .send()
            .await?;

        let response = check_status(response)?;
        Ok(response.bytes().await?)
    }

    async fn blob_request(
        &self,
        namespace: &str,
        repository: &str,
        digest: &Sha256Digest,
    ) -> Result<Response> {
        let url = self.endpoint.blob_url(namespace, repository, digest)?;
        debug!(%url, "requesting blob");

        let response = self
            .http
            .get(url)
            .header(header::AUTHORIZATION, self.bearer())
            .send()
            .await?;

        check_status(response)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.credential)
    }
}

fn check_status(response: Response) -> Result<Response> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound),
        StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
        status => Err(ClientError::Protocol(status)),
    }
}

/// An open byte stream for one blob of a release.
///
/// Dropping the value releases the underlying connection, so abandoning a
/// fetch mid-pipeline leaks nothing.
#[derive(Debug)]
pub struct BlobStream {
    digest: Sha256Digest,
    response: Response,
}

impl BlobStream {
    /// The content address this stream was requested under.
    ///
    /// Resolution trusts the backend; the bytes are not re-verified against
    /// this digest. Callers wanting that check can buffer the stream and use
    /// [`Sha256Digest::matches`].
    pub fn digest(&self) -> &Sha256Digest {
        &self.digest
    }

    /// Consume the blob as a stream of byte chunks.
    pub fn into_stream(self) -> impl Stream<Item = reqwest::Result<Bytes>> {
        self.response.bytes_stream()
    }

    /// Buffer the entire blob into memory.
    pub async fn bytes(self) -> Result<Bytes> {
        Ok(self.response.bytes().await?)
    }
}
