//! Resume model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The resume download link. A singleton: at most one row exists, and the
/// service picks insert vs update based on whether a row is already there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: i64,
    /// Public URL of the resume, either an uploaded file or an external link
    pub resume_link: String,
    pub updated_at: DateTime<Utc>,
}
