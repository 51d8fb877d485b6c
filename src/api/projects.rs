//! Project API endpoints
//!
//! Public listing plus the admin CRUD used by the portfolio screens.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::{ProjectResponse, SuccessResponse};
use crate::services::ProjectDraft;

/// Build the projects router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        // Update accepts POST alongside PUT; some admin clients only send POST
        .route(
            "/{id}",
            post(update_project).put(update_project).delete(delete_project),
        )
}

/// GET /api/projects - List all projects, newest first
async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = state.project_service.list().await?;
    Ok(Json(projects.into_iter().map(Into::into).collect()))
}

/// POST /api/projects - Create a project (admin)
async fn create_project(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state.project_service.create(&draft).await?;
    Ok(Json(project.into()))
}

/// PUT|POST /api/projects/{id} - Replace a project (admin)
async fn update_project(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
    Json(draft): Json<ProjectDraft>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let project = state.project_service.update(id, &draft).await?;
    Ok(Json(project.into()))
}

/// DELETE /api/projects/{id} - Delete a project and its uploaded image (admin)
async fn delete_project(
    State(state): State<AppState>,
    _session: AdminSession,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.project_service.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
