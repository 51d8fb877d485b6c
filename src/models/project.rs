//! Project model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Portfolio project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: i64,
    /// Project title
    pub title: String,
    /// Project description
    pub description: String,
    /// Technologies used, in display order
    pub tech_stack: Vec<String>,
    /// Cover image URL (absent = placeholder on the frontend)
    pub image_url: Option<String>,
    /// Storage path of the cover image when it was uploaded through the
    /// media store; absent for externally hosted images
    pub image_public_id: Option<String>,
    /// Link to the live project; `"#"` means no link
    pub live_url: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Payload for creating or replacing a project.
///
/// Updates are full-replace: the admin form always submits the entire
/// record, so create and replace share this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    #[serde(default = "default_live_url")]
    pub live_url: String,
}

fn default_live_url() -> String {
    "#".to_string()
}
