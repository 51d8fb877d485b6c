//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity and
//! dispatches on the configured database driver.

pub mod blog;
pub mod comment;
pub mod contact;
pub mod project;
pub mod resume;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use resume::{ResumeRepository, SqlxResumeRepository};
