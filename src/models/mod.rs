//! Data models
//!
//! This module contains all data structures used throughout the Folio backend.
//! Models represent:
//! - Database entities (Project, Blog, Comment, Contact, Resume)
//! - Insert/replace payloads produced by the form controllers

mod blog;
mod comment;
mod contact;
mod project;
mod resume;

pub use blog::{Blog, BlogCounter, BlogInput};
pub use comment::{Comment, CommentInput};
pub use contact::{Contact, ContactInput};
pub use project::{Project, ProjectInput};
pub use resume::Resume;
