//! Blog API endpoints
//!
//! The public read path (article page, like button) and the admin CRUD
//! behind the blog editor.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::{BlogResponse, SuccessResponse};
use crate::services::BlogDraft;

/// Build the blogs router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_blogs).post(create_blog))
        // One route entry serves both shapes: GET reads the segment as a
        // slug, PUT/DELETE as a numeric id
        .route("/{id}", get(get_blog).put(update_blog).delete(delete_blog))
        .route("/{id}/like", post(like_blog))
}

#[derive(Debug, Deserialize)]
struct ListBlogsQuery {
    /// `published=true` limits the listing to published posts; the admin
    /// list omits the parameter and sees drafts too.
    #[serde(default)]
    published: bool,
}

/// GET /api/blogs - List blogs, newest first
async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<ListBlogsQuery>,
) -> Result<Json<Vec<BlogResponse>>, ApiError> {
    let blogs = state.blog_service.list(query.published).await?;
    Ok(Json(blogs.into_iter().map(Into::into).collect()))
}

/// GET /api/blogs/{slug} - Public article page.
///
/// Only published posts resolve. A successful fetch fires the view
/// increment off the render path; its outcome never affects the response.
async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = state
        .blog_service
        .get_published_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found("Article not found"))?;

    let service = state.blog_service.clone();
    let id = blog.id;
    tokio::spawn(async move {
        service.record_view(id).await;
    });

    Ok(Json(blog.into()))
}

/// POST /api/blogs - Create a blog post (admin)
async fn create_blog(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(draft): Json<BlogDraft>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = state.blog_service.create(&draft).await?;
    Ok(Json(blog.into()))
}

/// PUT /api/blogs/{id} - Replace a blog post (admin)
async fn update_blog(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
    Json(draft): Json<BlogDraft>,
) -> Result<Json<BlogResponse>, ApiError> {
    let blog = state.blog_service.update(id, &draft).await?;
    Ok(Json(blog.into()))
}

/// DELETE /api/blogs/{id} - Delete a blog post and its uploaded image (admin)
async fn delete_blog(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.blog_service.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}

#[derive(Debug, Serialize)]
struct LikeResponse {
    success: bool,
    likes: i64,
}

/// POST /api/blogs/{id}/like - Increment the like counter.
///
/// Dedup is client-side only (the browser remembers liked posts in local
/// storage); a cleared client can like again. Accepted limitation.
async fn like_blog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<LikeResponse>, ApiError> {
    let likes = state.blog_service.like(id).await?;
    Ok(Json(LikeResponse {
        success: true,
        likes,
    }))
}
