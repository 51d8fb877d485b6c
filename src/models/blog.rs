//! Blog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// URL-safe unique slug
    pub slug: String,
    /// Short description / excerpt
    pub description: String,
    /// Rich HTML content
    pub content: String,
    /// Cover image URL
    pub image_url: Option<String>,
    /// Storage path of the cover image when uploaded through the media
    /// store; absent for externally hosted images
    pub image_public_id: Option<String>,
    /// Free-form category label
    pub category: String,
    /// Tags in display order
    pub tags: Vec<String>,
    /// Display name of the author
    pub author_name: String,
    /// SEO title (defaults to the post title when left blank)
    pub meta_title: String,
    /// SEO description (defaults to the description when left blank)
    pub meta_description: String,
    /// Whether the post is publicly visible
    pub is_published: bool,
    /// Set when the post transitions to published; cleared on unpublish.
    /// Re-publishing stamps a fresh time, earlier publish history is not kept.
    pub published_at: Option<DateTime<Utc>>,
    /// View count, incremented server-side on public reads
    #[serde(default)]
    pub views: i64,
    /// Like count, incremented from the like button
    #[serde(default)]
    pub likes: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last write timestamp
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a blog post.
///
/// Updates are full-replace: the admin editor submits the whole record.
/// Counters and timestamps are managed by the repository, never by callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlogInput {
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub content: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_author")]
    pub author_name: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub is_published: bool,
}

fn default_category() -> String {
    "Other".to_string()
}

fn default_author() -> String {
    "Admin".to_string()
}

/// Engagement counters stored on a blog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlogCounter {
    Views,
    Likes,
}

impl BlogCounter {
    /// Column name backing the counter
    pub fn column(&self) -> &'static str {
        match self {
            BlogCounter::Views => "views",
            BlogCounter::Likes => "likes",
        }
    }
}

impl std::fmt::Display for BlogCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.column())
    }
}
