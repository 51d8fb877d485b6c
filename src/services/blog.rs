//! Blog service
//!
//! Form controller and read path for blog posts:
//! - Validates drafts and derives the slug from the title when the slug
//!   field was left untouched
//! - Surfaces slug collisions as a distinct error instead of a generic
//!   database failure
//! - Applies the media resolution policy before the repository write
//! - Owns the best-effort view/like counters for the public pages

use serde::Deserialize;
use std::sync::Arc;

use crate::db::repositories::BlogRepository;
use crate::models::{Blog, BlogCounter, BlogInput};
use crate::services::media::{release_image, resolve_image, ImageSelection};
use crate::services::slug::{slugify, split_tags};
use crate::services::{ContentError, FieldError};
use crate::storage::DynMediaStore;

/// The blog editor form as submitted by the admin UI.
///
/// `tags` arrives as the raw comma-separated input string. `slug` is
/// whatever is in the slug field; the UI mirrors the title into it until
/// the admin types their own, and an empty field means "derive for me".
#[derive(Debug, Clone, Deserialize)]
pub struct BlogDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default = "default_author")]
    pub author_name: String,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub image: ImageSelection,
}

impl Default for BlogDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            slug: String::new(),
            description: String::new(),
            content: String::new(),
            category: default_category(),
            tags: String::new(),
            author_name: default_author(),
            meta_title: String::new(),
            meta_description: String::new(),
            is_published: false,
            image: ImageSelection::Keep,
        }
    }
}

fn default_category() -> String {
    "Other".to_string()
}

fn default_author() -> String {
    "Admin".to_string()
}

/// Service for managing blog posts
pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
    store: DynMediaStore,
}

impl BlogService {
    /// Create a new blog service
    pub fn new(repo: Arc<dyn BlogRepository>, store: DynMediaStore) -> Self {
        Self { repo, store }
    }

    /// List blogs; `published_only` hides drafts for the public site
    pub async fn list(&self, published_only: bool) -> Result<Vec<Blog>, ContentError> {
        let blogs = if published_only {
            self.repo.list_published().await?
        } else {
            self.repo.list().await?
        };
        Ok(blogs)
    }

    /// Get a blog by ID (admin editor load)
    pub async fn get(&self, id: i64) -> Result<Option<Blog>, ContentError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Get a published blog by slug (public article page). Drafts are
    /// invisible here.
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<Blog>, ContentError> {
        let blog = self.repo.get_by_slug(slug).await?;
        Ok(blog.filter(|b| b.is_published))
    }

    /// Create a blog post from a submitted draft
    pub async fn create(&self, draft: &BlogDraft) -> Result<Blog, ContentError> {
        validate(draft)?;
        let slug = derive_slug(draft)?;

        if self.repo.exists_by_slug(&slug).await? {
            return Err(ContentError::DuplicateSlug(slug));
        }

        // Media first, so the row never references an unfinished upload
        let image = resolve_image(&self.store, None, None, &draft.image).await;
        let input = to_input(draft, slug.clone(), image.url, image.public_id);

        match self.repo.create(&input).await {
            Ok(blog) => Ok(blog),
            // Two admin tabs can pass the pre-check together; the unique
            // index settles it and the loser still sees a slug error
            Err(e) if is_unique_violation(&e) => Err(ContentError::DuplicateSlug(slug)),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace a blog post with the submitted draft
    pub async fn update(&self, id: i64, draft: &BlogDraft) -> Result<Blog, ContentError> {
        validate(draft)?;
        let slug = derive_slug(draft)?;

        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound)?;

        if self.repo.exists_by_slug_excluding(&slug, id).await? {
            return Err(ContentError::DuplicateSlug(slug));
        }

        let image = resolve_image(
            &self.store,
            existing.image_url.as_deref(),
            existing.image_public_id.as_deref(),
            &draft.image,
        )
        .await;

        let input = to_input(draft, slug.clone(), image.url, image.public_id);
        match self.repo.replace(id, &input).await {
            Ok(Some(blog)) => Ok(blog),
            Ok(None) => Err(ContentError::NotFound),
            Err(e) if is_unique_violation(&e) => Err(ContentError::DuplicateSlug(slug)),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blog post, releasing its uploaded cover image first
    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound)?;

        release_image(&self.store, existing.image_public_id.as_deref()).await;

        if self.repo.delete(id).await? {
            Ok(())
        } else {
            Err(ContentError::NotFound)
        }
    }

    /// Record one view of a blog post.
    ///
    /// Best-effort: callers fire this off the render path and nothing is
    /// surfaced on failure. The atomic increment is tried first; if the
    /// backend rejects it, the read-then-write fallback runs, accepting
    /// its lost-update race.
    pub async fn record_view(&self, id: i64) {
        if let Err(e) = self.increment(id, BlogCounter::Views).await {
            tracing::debug!("Failed to record view for blog {}: {}", id, e);
        }
    }

    /// Record one like and return the new count.
    ///
    /// Idempotence is client-side only: the browser disables the button
    /// per blog id in local storage, but nothing stops a cleared client
    /// from liking again. That limitation is accepted.
    pub async fn like(&self, id: i64) -> Result<i64, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound)?;

        self.increment(id, BlogCounter::Likes).await?;

        let blog = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound)?;
        Ok(blog.likes)
    }

    /// Count blogs (dashboard stats)
    pub async fn count(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count().await?)
    }

    /// Count published blogs (dashboard stats)
    pub async fn count_published(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count_published().await?)
    }

    async fn increment(&self, id: i64, counter: BlogCounter) -> Result<(), ContentError> {
        match self.repo.increment_counter(id, counter).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    "Atomic {} increment failed ({}), using fallback",
                    counter,
                    e
                );
                Ok(self.repo.increment_counter_fallback(id, counter).await?)
            }
        }
    }
}

fn validate(draft: &BlogDraft) -> Result<(), ContentError> {
    let mut errors = Vec::new();
    if draft.title.trim().is_empty() {
        errors.push(FieldError::required("title"));
    }
    if draft.description.trim().is_empty() {
        errors.push(FieldError::required("description"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ContentError::Validation(errors))
    }
}

/// The slug the admin typed wins; an empty field derives one from the
/// title. A title that slugifies to nothing cannot be saved.
fn derive_slug(draft: &BlogDraft) -> Result<String, ContentError> {
    let manual = draft.slug.trim();
    let slug = if manual.is_empty() {
        slugify(&draft.title)
    } else {
        slugify(manual)
    };

    if slug.is_empty() {
        return Err(ContentError::Validation(vec![FieldError {
            field: "slug",
            message: "slug cannot be derived from the title; set one manually".to_string(),
        }]));
    }
    Ok(slug)
}

fn to_input(
    draft: &BlogDraft,
    slug: String,
    image_url: Option<String>,
    image_public_id: Option<String>,
) -> BlogInput {
    let title = draft.title.trim().to_string();
    let description = draft.description.trim().to_string();
    BlogInput {
        // SEO fields fall back to the post's own title/description
        meta_title: if draft.meta_title.trim().is_empty() {
            title.clone()
        } else {
            draft.meta_title.trim().to_string()
        },
        meta_description: if draft.meta_description.trim().is_empty() {
            description.clone()
        } else {
            draft.meta_description.trim().to_string()
        },
        title,
        slug,
        description,
        content: draft.content.clone(),
        image_url,
        image_public_id,
        category: draft.category.trim().to_string(),
        tags: split_tags(&draft.tags),
        author_name: draft.author_name.trim().to_string(),
        is_published: draft.is_published,
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
