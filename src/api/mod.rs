//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints of the Folio backend:
//! - Project API endpoints
//! - Blog API endpoints (public read path included)
//! - Comment API endpoints
//! - Contact API endpoint
//! - Media upload endpoints
//! - Resume API endpoints
//! - Admin endpoints (stats, editor loads, contact inbox)

pub mod admin;
pub mod blogs;
pub mod comments;
pub mod contact;
pub mod middleware;
pub mod projects;
pub mod responses;
pub mod resume;
pub mod upload;


use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthStatus};

/// Build the API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/projects", projects::router())
        .nest("/blogs", blogs::router())
        .nest("/comments", comments::router())
        .nest("/contact", contact::router())
        .nest("/resume", resume::router())
        .nest("/admin", admin::router())
        .merge(upload::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
