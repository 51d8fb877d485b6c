//! API middleware and shared request plumbing
//!
//! Contains:
//! - `AppState`, the service graph handed to every handler
//! - `ApiError`, the serialized error envelope
//! - The admin guard: an explicit token check producing a typed
//!   `AuthStatus`, surfaced to handlers as the `AdminSession` extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::db::repositories::{CommentRepository, ContactRepository};
use crate::services::{
    BlogService, ContactService, ContentError, NotificationError, ProjectService, ResumeService,
};
use crate::storage::{DynMediaStore, StorageError};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub project_service: Arc<ProjectService>,
    pub blog_service: Arc<BlogService>,
    pub contact_service: Arc<ContactService>,
    pub resume_service: Arc<ResumeService>,
    pub comment_repo: Arc<dyn CommentRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub media_store: DynMediaStore,
    pub upload_config: Arc<UploadConfig>,
    /// Bearer token required for admin routes; `None` disables them
    pub admin_token: Option<String>,
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "DUPLICATE_SLUG" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::NotFound => ApiError::not_found("Not found"),
            ContentError::Validation(fields) => ApiError::with_details(
                "VALIDATION_ERROR",
                "Validation failed",
                serde_json::to_value(fields).unwrap_or_default(),
            ),
            ContentError::DuplicateSlug(slug) => ApiError::new(
                "DUPLICATE_SLUG",
                format!("Slug already exists: {}. Please choose a unique URL.", slug),
            ),
            ContentError::Storage(e) => ApiError::from(e),
            ContentError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        tracing::error!("Storage error: {}", err);
        ApiError::new("STORAGE_ERROR", err.to_string())
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Validation(fields) => ApiError::with_details(
                "VALIDATION_ERROR",
                "Validation failed",
                serde_json::to_value(fields).unwrap_or_default(),
            ),
            NotificationError::Email(e) => {
                tracing::error!("Notification email failed: {:#}", e);
                ApiError::internal_error("Failed to send message")
            }
            NotificationError::NoRecipient => {
                tracing::error!("Contact form hit without a configured recipient");
                ApiError::internal_error("Contact form is not configured")
            }
        }
    }
}

/// Outcome of the admin session check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    /// The request carries the configured admin token
    Authenticated,
    /// The request is not an admin session; the reason says why
    Unauthenticated(&'static str),
}

/// Check whether a request is an authenticated admin session.
///
/// The token travels as `Authorization: Bearer <token>`. Without a
/// configured token there is no way in; admin routes stay closed.
pub fn check_admin(headers: &HeaderMap, admin_token: Option<&str>) -> AuthStatus {
    let expected = match admin_token {
        Some(token) if !token.is_empty() => token,
        _ => return AuthStatus::Unauthenticated("Admin access is not configured"),
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token == expected => AuthStatus::Authenticated,
        Some(_) => AuthStatus::Unauthenticated("Invalid admin token"),
        None => AuthStatus::Unauthenticated("Missing admin token"),
    }
}

/// Extractor marking a handler as admin-only.
///
/// Handlers take `_session: AdminSession` and the check runs before the
/// body executes; unauthenticated requests get the 401 envelope.
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match check_admin(&parts.headers, state.admin_token.as_deref()) {
            AuthStatus::Authenticated => Ok(AdminSession),
            AuthStatus::Unauthenticated(reason) => Err(ApiError::unauthorized(reason)),
        }
    }
}
