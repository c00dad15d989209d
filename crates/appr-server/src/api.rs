//! HTTP surface of the registry
//!
//! Read requests are gated behind the access authority, then served by
//! redirecting the client to a backend-provided URL when the storage supports
//! direct downloads, falling back to streaming the bytes through this process
//! when it does not.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use tracing::debug;

use appr_schema::{MANIFEST_LIST_MEDIA_TYPE, MANIFEST_MEDIA_TYPE};

use crate::auth::Authorization;
use crate::error::ApiError;
use crate::resource::ResourceIdentifier;
use crate::storage::{Storage, StorageError};

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub auth: Arc<dyn Authorization>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, auth: Arc<dyn Authorization>) -> Self {
        Self { storage, auth }
    }
}

/// Build the registry router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v0/{namespace}/{repository}/manifests/{reference}",
            get(get_manifest).head(head_manifest).delete(delete_manifest),
        )
        .route(
            "/v0/{namespace}/{repository}/blobs/{digest}",
            get(get_blob).head(head_blob).delete(delete_blob),
        )
        // Upload sessions and tag listing are not implemented.
        .route(
            "/v0/{namespace}/{repository}/blobs/uploads",
            post(unimplemented_route),
        )
        .route(
            "/v0/{namespace}/{repository}/blobs/uploads/{session}",
            put(unimplemented_route),
        )
        .route(
            "/v0/{namespace}/{repository}/tags/list",
            get(unimplemented_route),
        )
        .with_state(state)
}

/// Parse the bearer credential out of the `Authorization` header.
///
/// An absent header yields the empty credential, which is still passed to the
/// access authority unchanged.
fn credential(headers: &HeaderMap) -> &str {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
        .unwrap_or("")
}

/// Media type negotiation for manifest requests: a client explicitly asking
/// for a single manifest gets one; everything else gets the list
/// representation.
fn negotiated_manifest_media_type(headers: &HeaderMap) -> &'static str {
    match headers.get(header::ACCEPT).and_then(|value| value.to_str().ok()) {
        Some(accept) if accept.contains(MANIFEST_MEDIA_TYPE) => MANIFEST_MEDIA_TYPE,
        _ => MANIFEST_LIST_MEDIA_TYPE,
    }
}

/// Check the read permission, then attempt to redirect the client to the
/// resource, falling back to streaming it when the storage cannot produce
/// direct URLs.
async fn redirect_or_stream(
    state: &AppState,
    headers: &HeaderMap,
    id: ResourceIdentifier,
    content_type: Option<&'static str>,
) -> Result<Response, ApiError> {
    state
        .auth
        .read_permission(credential(headers), &id)
        .await?;

    match state.storage.download_url(&id).await {
        Ok(url) => {
            debug!(resource = %id, %url, "redirecting to storage");
            Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
        }
        Err(StorageError::Unsupported) => {
            let stream = state.storage.read(&id).await?;
            debug!(resource = %id, "streaming resource");
            // The stream is owned by the response body and dropped with it on
            // every exit path, including client disconnect.
            let body = Body::from_stream(stream);
            Ok(match content_type {
                Some(content_type) => {
                    ([(header::CONTENT_TYPE, content_type)], body).into_response()
                }
                None => body.into_response(),
            })
        }
        Err(err) => Err(err.into()),
    }
}

/// Check the read permission and stat the resource, reporting its size as the
/// `Content-Length` header with no body.
async fn content_length_of(
    state: &AppState,
    headers: &HeaderMap,
    id: ResourceIdentifier,
) -> Result<Response, ApiError> {
    state
        .auth
        .read_permission(credential(headers), &id)
        .await?;

    let size = state.storage.stat(&id).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_LENGTH, size.to_string())],
    )
        .into_response())
}

/// Check the write permission and delete the resource.
async fn remove_resource(
    state: &AppState,
    headers: &HeaderMap,
    id: ResourceIdentifier,
) -> Result<Response, ApiError> {
    state
        .auth
        .write_permission(credential(headers), &id)
        .await?;

    state.storage.delete(&id).await?;
    debug!(resource = %id, "deleted resource");
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn get_manifest(
    State(state): State<AppState>,
    Path((namespace, repository, reference)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let content_type = negotiated_manifest_media_type(&headers);
    let id = ResourceIdentifier::manifest(namespace, repository, reference);
    redirect_or_stream(&state, &headers, id, Some(content_type)).await
}

async fn head_manifest(
    State(state): State<AppState>,
    Path((namespace, repository, reference)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = ResourceIdentifier::manifest(namespace, repository, reference);
    content_length_of(&state, &headers, id).await
}

async fn delete_manifest(
    State(state): State<AppState>,
    Path((namespace, repository, reference)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = ResourceIdentifier::manifest(namespace, repository, reference);
    remove_resource(&state, &headers, id).await
}

async fn get_blob(
    State(state): State<AppState>,
    Path((namespace, repository, digest)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = ResourceIdentifier::blob(namespace, repository, digest);
    redirect_or_stream(&state, &headers, id, None).await
}

async fn head_blob(
    State(state): State<AppState>,
    Path((namespace, repository, digest)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = ResourceIdentifier::blob(namespace, repository, digest);
    content_length_of(&state, &headers, id).await
}

async fn delete_blob(
    State(state): State<AppState>,
    Path((namespace, repository, digest)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = ResourceIdentifier::blob(namespace, repository, digest);
    remove_resource(&state, &headers, id).await
}

async fn unimplemented_route() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
