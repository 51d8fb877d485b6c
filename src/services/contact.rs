//! Contact notification dispatcher
//!
//! A contact submission fans out into two independent actions: the row is
//! persisted as a backup record, and the notification email is sent. The
//! email is the primary channel, so a database failure is logged and
//! swallowed while an email failure fails the submission.

use std::sync::Arc;

use crate::db::repositories::ContactRepository;
use crate::models::ContactInput;
use crate::services::email::{contact_notification, DynMailer};
use crate::services::FieldError;

/// Error type for contact submissions
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// Missing required fields; nothing was persisted or sent
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// The notification email could not be sent. The database row may
    /// still have been written.
    #[error("Failed to send notification: {0}")]
    Email(#[source] anyhow::Error),

    /// No recipient is configured, so notifications cannot be delivered
    #[error("No notification recipient configured")]
    NoRecipient,
}

/// Dispatcher for contact-form submissions
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    mailer: DynMailer,
    recipient: Option<String>,
}

impl ContactService {
    /// Create a new contact service.
    ///
    /// `recipient` is where notification emails go; without one the
    /// endpoint rejects submissions outright.
    pub fn new(
        repo: Arc<dyn ContactRepository>,
        mailer: DynMailer,
        recipient: Option<String>,
    ) -> Self {
        Self {
            repo,
            mailer,
            recipient,
        }
    }

    /// Handle one submission: persist the row (best-effort), then send
    /// the notification email (required).
    pub async fn submit(&self, input: ContactInput) -> Result<(), NotificationError> {
        validate(&input)?;

        let recipient = self
            .recipient
            .as_deref()
            .ok_or(NotificationError::NoRecipient)?;

        // The row is a backup record; a failed insert must not block the
        // notification.
        if let Err(e) = self.repo.create(&input).await {
            tracing::warn!("Failed to persist contact message: {}", e);
        }

        let email = contact_notification(&input, recipient);
        self.mailer
            .send(&email)
            .await
            .map_err(NotificationError::Email)?;

        Ok(())
    }
}

fn validate(input: &ContactInput) -> Result<(), NotificationError> {
    let mut errors = Vec::new();
    if input.user_name.trim().is_empty() {
        errors.push(FieldError::required("user_name"));
    }
    if input.user_email.trim().is_empty() {
        errors.push(FieldError::required("user_email"));
    }
    if input.user_subject.trim().is_empty() {
        errors.push(FieldError::required("user_subject"));
    }
    if input.message.trim().is_empty() {
        errors.push(FieldError::required("message"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(NotificationError::Validation(errors))
    }
}
