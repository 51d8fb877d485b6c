//! Shared API response types
//!
//! Response structures used across the public and admin endpoints.
//! Timestamps are serialized as RFC 3339 strings; the tag-style fields
//! carry both the stored list and the comma-joined string the admin
//! forms bind to.

use serde::{Deserialize, Serialize};

use crate::models::{Blog, Comment, Contact, Project, Resume};
use crate::services::join_tags;

/// Project as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub tech_stack: Vec<String>,
    /// The comma-joined form the tech-stack input round-trips through
    pub tech_stack_input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_public_id: Option<String>,
    pub live_url: String,
    pub created_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            tech_stack_input: join_tags(&project.tech_stack),
            tech_stack: project.tech_stack,
            image_url: project.image_url,
            image_public_id: project.image_public_id,
            live_url: project.live_url,
            created_at: project.created_at.to_rfc3339(),
        }
    }
}

/// Blog post as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct BlogResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_public_id: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    /// The comma-joined form the tags input round-trips through
    pub tags_input: String,
    pub author_name: String,
    pub meta_title: String,
    pub meta_description: String,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub views: i64,
    pub likes: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id,
            title: blog.title,
            slug: blog.slug,
            description: blog.description,
            content: blog.content,
            image_url: blog.image_url,
            image_public_id: blog.image_public_id,
            category: blog.category,
            tags_input: join_tags(&blog.tags),
            tags: blog.tags,
            author_name: blog.author_name,
            meta_title: blog.meta_title,
            meta_description: blog.meta_description,
            is_published: blog.is_published,
            published_at: blog.published_at.map(|dt| dt.to_rfc3339()),
            views: blog.views,
            likes: blog.likes,
            created_at: blog.created_at.to_rfc3339(),
            updated_at: blog.updated_at.to_rfc3339(),
        }
    }
}

/// Comment as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub blog_id: i64,
    pub author: String,
    pub text: String,
    pub created_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            blog_id: comment.blog_id,
            author: comment.author,
            text: comment.text,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Contact message as returned by the admin API
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: i64,
    pub user_name: String,
    pub user_email: String,
    pub user_phone: String,
    pub user_subject: String,
    pub message: String,
    pub created_at: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            user_name: contact.user_name,
            user_email: contact.user_email,
            user_phone: contact.user_phone,
            user_subject: contact.user_subject,
            message: contact.message,
            created_at: contact.created_at.to_rfc3339(),
        }
    }
}

/// Resume as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ResumeResponse {
    pub id: i64,
    pub resume_link: String,
    pub updated_at: String,
}

impl From<Resume> for ResumeResponse {
    fn from(resume: Resume) -> Self {
        Self {
            id: resume.id,
            resume_link: resume.resume_link,
            updated_at: resume.updated_at.to_rfc3339(),
        }
    }
}

/// Generic `{success}` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
