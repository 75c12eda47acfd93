//! Serves the signed URLs issued by the local filesystem backend.

use crate::error::ErrorEnvelope;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use kendra_storage::{CloudStorage, LocalStorage, SignedUrlAction, StorageError};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SignedQuery {
    pub action: String,
    pub expires: u64,
    pub signature: String,
}

/// Local backend plus the error-detail policy of the running server.
#[derive(Clone)]
pub struct LocalFilesState {
    pub storage: Arc<LocalStorage>,
    pub expose_error_details: bool,
}

fn verify(
    state: &LocalFilesState,
    bucket: &str,
    key: &str,
    expected: SignedUrlAction,
    query: Result<Query<SignedQuery>, QueryRejection>,
) -> Result<(), StorageError> {
    let Query(query) = query
        .map_err(|_| StorageError::InvalidSignature("missing signature parameters".to_string()))?;

    let action: SignedUrlAction = query.action.parse()?;
    if action != expected {
        return Err(StorageError::InvalidSignature(format!(
            "URL was signed for {}",
            action.as_str()
        )));
    }

    state
        .storage
        .verify_signature(bucket, key, action, query.expires, &query.signature)
}

/// Download a file through a signed read URL
#[tracing::instrument(skip(state, query), fields(operation = "local_download"))]
pub async fn download(
    State(state): State<LocalFilesState>,
    Path((bucket, key)): Path<(String, String)>,
    query: Result<Query<SignedQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ErrorEnvelope> {
    let reject = |e: StorageError| ErrorEnvelope::from_failure(&e, state.expose_error_details);

    verify(&state, &bucket, &key, SignedUrlAction::Read, query).map_err(reject)?;
    let data = state.storage.read(&bucket, &key).await.map_err(reject)?;

    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data))
}

/// Upload a file through a signed write URL
#[tracing::instrument(skip(state, query, body), fields(operation = "local_upload", size_bytes = body.len()))]
pub async fn upload(
    State(state): State<LocalFilesState>,
    Path((bucket, key)): Path<(String, String)>,
    query: Result<Query<SignedQuery>, QueryRejection>,
    body: Bytes,
) -> Result<impl IntoResponse, ErrorEnvelope> {
    let reject = |e: StorageError| ErrorEnvelope::from_failure(&e, state.expose_error_details);

    verify(&state, &bucket, &key, SignedUrlAction::Write, query).map_err(reject)?;
    let metadata = state
        .storage
        .upload(&bucket, &key, body)
        .await
        .map_err(reject)?;

    Ok(Json(metadata))
}
