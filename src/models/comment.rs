//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reader comment on a blog post.
///
/// Comments are append-only from the public side; only the admin can
/// remove them, and they go away with their blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub blog_id: i64,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for posting a comment
#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub blog_id: i64,
    pub author: String,
    pub text: String,
}
