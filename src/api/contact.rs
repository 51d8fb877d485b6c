//! Contact API endpoint
//!
//! The public contact form. One submission persists a backup row and
//! sends the notification email; see the contact service for the
//! independence of the two legs.

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::ContactInput;

/// Build the contact router
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(submit_contact))
}

#[derive(Debug, Serialize)]
struct ContactSubmitted {
    success: bool,
    message: String,
}

/// POST /api/contact - Submit the contact form
async fn submit_contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<Json<ContactSubmitted>, ApiError> {
    state.contact_service.submit(input).await?;

    Ok(Json(ContactSubmitted {
        success: true,
        message: "Message sent successfully".to_string(),
    }))
}
