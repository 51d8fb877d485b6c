//! Admin API endpoints
//!
//! Dashboard stats, the editor's load-by-id, and the screens for contact
//! messages. Everything here requires the admin session.

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use crate::api::comments;
use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::{BlogResponse, ContactResponse, SuccessResponse};

/// Build the admin router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(site_stats))
        .route("/blogs/{id}", get(get_blog_by_id))
        .route("/contacts", get(list_contacts))
        .route("/contacts/{id}", delete(delete_contact))
        .route("/comments/{id}", delete(comments::delete_comment))
}

/// Entity counts for the dashboard overview
#[derive(Debug, Serialize)]
struct SiteStats {
    projects: i64,
    blogs: i64,
    published_blogs: i64,
    contacts: i64,
    comments: i64,
}

/// GET /api/admin/stats - Dashboard entity counts
async fn site_stats(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<SiteStats>, ApiError> {
    let projects = state.project_service.count().await?;
    let blogs = state.blog_service.count().await?;
    let published_blogs = state.blog_service.count_published().await?;
    let contacts = state.contact_repo.count().await.map_err(|e| {
        tracing::error!("Failed to count contacts: {:#}", e);
        ApiError::internal_error("Failed to load stats")
    })?;
    let comments = state.comment_repo.count().await.map_err(|e| {
        tracing::error!("Failed to count comments: {:#}", e);
        ApiError::internal_error("Failed to load stats")
    })?;

    Ok(Json(SiteStats {
        projects,
        blogs,
        published_blogs,
        contacts,
        comments,
    }))
}

/// GET /api/admin/blogs/{id} - Load a post (drafts included) for the editor
async fn get_blog_by_id(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = state
        .blog_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Blog not found"))?;

    Ok(Json(blog.into()))
}

/// GET /api/admin/contacts - All contact messages, newest first
async fn list_contacts(
    State(state): State<AppState>,
    _session: AdminSession,
) -> Result<Json<Vec<ContactResponse>>, ApiError> {
    let contacts = state.contact_repo.list().await.map_err(|e| {
        tracing::error!("Failed to list contacts: {:#}", e);
        ApiError::internal_error("Failed to load contact messages")
    })?;

    Ok(Json(contacts.into_iter().map(Into::into).collect()))
}

/// DELETE /api/admin/contacts/{id} - Remove a contact message
async fn delete_contact(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = state.contact_repo.delete(id).await.map_err(|e| {
        tracing::error!("Failed to delete contact: {:#}", e);
        ApiError::internal_error("Failed to delete contact message")
    })?;

    if !removed {
        return Err(ApiError::not_found("Contact message not found"));
    }
    Ok(Json(SuccessResponse::ok()))
}
