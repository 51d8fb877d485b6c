//! Resume API endpoints
//!
//! Public read of the resume link and the admin save behind the resume
//! screen. Uploaded resume files travel through the upload endpoint; the
//! resulting URL is saved here like any external link.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::api::middleware::{AdminSession, ApiError, AppState};
use crate::api::responses::ResumeResponse;
use crate::services::ResumeDraft;

/// Build the resume router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_resume).put(save_resume))
}

/// GET /api/resume - The published resume link
async fn get_resume(State(state): State<AppState>) -> Result<Json<ResumeResponse>, ApiError> {
    let resume = state
        .resume_service
        .get()
        .await?
        .ok_or_else(|| ApiError::not_found("No resume has been saved"))?;

    Ok(Json(resume.into()))
}

/// PUT /api/resume - Save the resume link (admin)
async fn save_resume(
    State(state): State<AppState>,
    _session: AdminSession,
    Json(draft): Json<ResumeDraft>,
) -> Result<Json<ResumeResponse>, ApiError> {
    let resume = state.resume_service.save(&draft).await?;
    Ok(Json(resume.into()))
}
