//! Comment API endpoints
//!
//! Public read/append for blog comments; removal is admin-only and lives
//! in the admin router.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::{CommentResponse, SuccessResponse};
use crate::models::CommentInput;

/// Build the public comments router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_comment))
        .route("/{blog_id}", get(list_comments))
}

/// GET /api/comments/{blog_id} - Comments for a post, oldest first
async fn list_comments(
    State(state): State<AppState>,
    Path(blog_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state
        .comment_repo
        .list_by_blog(blog_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list comments: {:#}", e);
            ApiError::internal_error("Failed to load comments")
        })?;

    Ok(Json(comments.into_iter().map(Into::into).collect()))
}

/// POST /api/comments - Append a comment to a post
async fn create_comment(
    State(state): State<AppState>,
    Json(input): Json<CommentInput>,
) -> Result<Json<CommentResponse>, ApiError> {
    if input.author.trim().is_empty() || input.text.trim().is_empty() {
        return Err(ApiError::validation_error("author and text are required"));
    }

    let comment = state.comment_repo.create(&input).await.map_err(|e| {
        tracing::error!("Failed to create comment: {:#}", e);
        ApiError::internal_error("Failed to post comment")
    })?;

    Ok(Json(comment.into()))
}

/// DELETE /api/admin/comments/{id} - Remove a comment (admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = state.comment_repo.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete comment: {:#}", e);
        ApiError::internal_error("Failed to delete comment")
    })?;

    if !removed {
        return Err(ApiError::not_found("Comment not found"));
    }
    Ok(Json(SuccessResponse::ok()))
}
