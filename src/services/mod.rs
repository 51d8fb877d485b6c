//! Services layer - Business logic
//!
//! This module contains the business logic of the Folio backend. Services
//! are responsible for:
//! - Validating typed form drafts at the boundary
//! - Deriving computed fields (slugs, tag lists, SEO defaults)
//! - Coordinating media store calls with repository writes
//! - Dispatching contact notifications

pub mod blog;
pub mod contact;
pub mod email;
pub mod media;
pub mod project;
pub mod resume;
pub mod slug;

pub use blog::{BlogDraft, BlogService};
pub use contact::{ContactService, NotificationError};
pub use email::{contact_notification, Mailer, OutgoingEmail, SmtpMailer};
pub use media::{resolve_image, ImageSelection, ResolvedImage};
pub use project::{ProjectDraft, ProjectService};
pub use resume::{ResumeDraft, ResumeService};
pub use slug::{join_tags, slugify, split_tags};

use serde::Serialize;

use crate::storage::StorageError;

/// A single failed field in a submitted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field name as submitted
    pub field: &'static str,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{} is required", field),
        }
    }
}

/// Error type for content operations (projects, blogs, resume)
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The requested record does not exist
    #[error("Not found")]
    NotFound,

    /// One or more submitted fields failed validation.
    /// The form stays open; nothing was written.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Another blog already uses this slug
    #[error("Slug already exists: {0}")]
    DuplicateSlug(String),

    /// A media store write failed; the submit is aborted
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Anything else (database, serialization)
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
