//! Media upload API endpoints
//!
//! The thin HTTP face of the media store gateway. Forms upload a file
//! here first and then submit the returned `{secure_url, public_id}`
//! pair with the entity draft; the controllers release superseded
//! objects through the same gateway.

use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::SuccessResponse;
use crate::storage::delete_if_present;

/// Build the upload router (mounted at the API root)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-image", post(upload_image))
        .route("/delete-image", post(delete_image))
}

/// Response for a successful upload
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub secure_url: String,
    pub public_id: String,
}

/// POST /api/upload-image - Store a media file (admin).
///
/// Accepts multipart/form-data with a single file field named `file`.
async fn upload_image(
    State(state): State<AppState>,
    _session: AdminSession,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let config = &state.upload_config;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(ApiError::validation_error(format!(
                "Invalid file type: {}. Allowed types: {:?}",
                content_type, config.allowed_types
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "File too large. Maximum size: {} bytes ({} MB)",
                config.max_file_size,
                config.max_file_size / 1024 / 1024
            )));
        }

        let object = state
            .media_store
            .upload(&data, &content_type, &filename)
            .await?;

        return Ok(Json(UploadResponse {
            secure_url: object.url,
            public_id: object.public_id,
        }));
    }

    Err(ApiError::validation_error("No file provided"))
}

#[derive(Debug, Deserialize)]
struct DeleteImageRequest {
    public_id: Option<String>,
}

/// POST /api/delete-image - Remove a stored media object (admin).
///
/// Deleting an already-gone object succeeds; an absent `public_id` is a
/// no-op (forms send whatever they hold).
async fn delete_image(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(request): Json<DeleteImageRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    delete_if_present(&state.media_store, request.public_id.as_deref()).await?;
    Ok(Json(SuccessResponse::ok()))
}
