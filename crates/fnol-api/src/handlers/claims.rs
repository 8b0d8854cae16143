//! Claims handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::debug;

use fnol_core::{ClaimAnalysis, ClaimProcessor, StoredClaim, Upload};

use crate::{error::ApiError, AppState};

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct ExtractTextResponse {
    pub text: String,
}

/// Extracts plain text from an uploaded document (or the sample document)
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: Option<Multipart>,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    let upload = read_upload(multipart).await?;
    let text = extract(&state, upload).await?;
    Ok(Json(ExtractTextResponse { text }))
}

/// Extracts fields from an uploaded document and routes the claim
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Option<Multipart>,
) -> Result<Json<ClaimAnalysis>, ApiError> {
    let upload = read_upload(multipart).await?;
    let text = extract(&state, upload).await?;
    Ok(Json(state.analyzer.analyze(&text)))
}

/// Saves a (possibly reviewed) analysis
pub async fn save_claim(
    State(state): State<AppState>,
    Json(analysis): Json<ClaimAnalysis>,
) -> Result<Json<StoredClaim>, ApiError> {
    let store = Arc::clone(&state.store);
    let stored = tokio::task::spawn_blocking(move || store.save(&analysis)).await??;
    Ok(Json(stored))
}

/// Lists saved claims
pub async fn list_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredClaim>>, ApiError> {
    Ok(Json(state.store.list()?))
}

/// Gets a saved claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StoredClaim>, ApiError> {
    state
        .store
        .get(id)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Claim {} not found", id)))
}

/// Pull the `file` part out of a multipart body, if any.
async fn read_upload(multipart: Option<Multipart>) -> Result<Option<Upload>, ApiError> {
    let Some(mut multipart) = multipart else {
        return Ok(None);
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?.to_vec();
        debug!("Received upload {:?} ({} bytes)", file_name, data.len());

        return Ok(Some(Upload {
            file_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

/// Run document extraction off the async executor.
async fn extract(state: &AppState, upload: Option<Upload>) -> Result<String, ApiError> {
    let documents = Arc::clone(&state.documents);
    let text = tokio::task::spawn_blocking(move || documents.extract(upload.as_ref())).await??;
    Ok(text)
}
