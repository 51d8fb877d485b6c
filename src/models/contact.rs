//! Contact message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message submitted through the public contact form.
///
/// Rows are a backup record of the email notification; append-only from
/// the public side, deletable by the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Payload of a contact-form submission
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContactInput {
    pub user_name: String,
    pub user_email: String,
    #[serde(default)]
    pub user_phone: String,
    pub user_subject: String,
    pub message: String,
}
