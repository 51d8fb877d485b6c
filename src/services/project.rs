//! Project service
//!
//! Form controller for the project editor:
//! - Validates the submitted draft before any network call
//! - Splits the comma-separated tech stack into its stored form
//! - Applies the media resolution policy before the repository write
//! - Releases the cover image when a project is deleted

use serde::Deserialize;
use std::sync::Arc;

use crate::db::repositories::ProjectRepository;
use crate::models::{Project, ProjectInput};
use crate::services::media::{release_image, resolve_image, ImageSelection};
use crate::services::slug::split_tags;
use crate::services::{ContentError, FieldError};
use crate::storage::DynMediaStore;

/// The project form as submitted by the admin UI.
///
/// `tech_stack` arrives as the raw comma-separated input string and is
/// split on save; loading it back for editing joins it again.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub image: ImageSelection,
}

/// Service for managing portfolio projects
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
    store: DynMediaStore,
}

impl ProjectService {
    /// Create a new project service
    pub fn new(repo: Arc<dyn ProjectRepository>, store: DynMediaStore) -> Self {
        Self { repo, store }
    }

    /// List all projects, newest first
    pub async fn list(&self) -> Result<Vec<Project>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Get a project by ID
    pub async fn get(&self, id: i64) -> Result<Option<Project>, ContentError> {
        Ok(self.repo.get_by_id(id).await?)
    }

    /// Create a project from a submitted draft
    pub async fn create(&self, draft: &ProjectDraft) -> Result<Project, ContentError> {
        validate(draft)?;

        // Media first, so the row never references an unfinished upload
        let image = resolve_image(&self.store, None, None, &draft.image).await;

        let input = to_input(draft, image.url, image.public_id);
        Ok(self.repo.create(&input).await?)
    }

    /// Replace a project with the submitted draft
    pub async fn update(&self, id: i64, draft: &ProjectDraft) -> Result<Project, ContentError> {
        validate(draft)?;

        let existing = self
            .repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound)?;

        let image = resolve_image(
            &self.store,
            existing.image_url.as_deref(),
            existing.image_public_id.as_deref(),
            &draft.image,
        )
        .await;

        let input = to_input(draft, image.url, image.public_id);
        self.repo
            .replace(id, &input)
            .await?
            .ok_or(ContentError::NotFound)
    }

    /// Delete a project, releasing its uploaded cover image first
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

    /// Count projects (dashboard stats)
    pub async fn count(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count().await?)
    }
}

fn validate(draft: &ProjectDraft) -> Result<(), ContentError> {
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

fn to_input(
    draft: &ProjectDraft,
    image_url: Option<String>,
    image_public_id: Option<String>,
) -> ProjectInput {
    let live_url = draft.live_url.trim();
    ProjectInput {
        title: draft.title.trim().to_string(),
        description: draft.description.trim().to_string(),
        tech_stack: split_tags(&draft.tech_stack),
        image_url,
        image_public_id,
        live_url: if live_url.is_empty() {
            // "#" is the frontend's no-link sentinel
            "#".to_string()
        } else {
            live_url.to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxProjectRepository;
    use crate::db::{create_test_pool, migrations};
    use crate::services::media::tests::RecordingStore;

    async fn setup() -> (ProjectService, Arc<RecordingStore>) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let store = RecordingStore::new();
        let service = ProjectService::new(
            Arc::new(SqlxProjectRepository::new(pool)),
            store.clone(),
        );
        (service, store)
    }

    fn draft_with_upload(title: &str) -> ProjectDraft {
        ProjectDraft {
            title: title.to_string(),
            description: "A project".to_string(),
            tech_stack: "Rust, Axum".to_string(),
            live_url: "https://example.com".to_string(),
            image: ImageSelection::Uploaded {
                url: "/uploads/uploads/1_cover.png".to_string(),
                public_id: "uploads/1_cover.png".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_create_project_from_draft() {
        let (service, store) = setup().await;

        let project = service
            .create(&draft_with_upload("Site"))
            .await
            .expect("Failed to create");

        assert_eq!(project.title, "Site");
        assert_eq!(project.tech_stack, vec!["Rust", "Axum"]);
        assert_eq!(project.image_public_id.as_deref(), Some("uploads/1_cover.png"));
        // Creating over nothing deletes nothing
        assert!(store.deleted().is_empty());
    }

    #[tokio::test]
    async fn test_validation_fails_before_any_side_effect() {
        let (service, store) = setup().await;

        let draft = ProjectDraft {
            title: "  ".to_string(),
            description: "".to_string(),
            ..ProjectDraft::default()
        };

        match service.create(&draft).await {
            Err(ContentError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["title", "description"]);
            }
            other => panic!("Expected validation error, got {:?}", other.err()),
        }

        assert!(store.deleted().is_empty());
        assert_eq!(service.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_switch_to_external_releases_upload_exactly_once() {
        let (service, store) = setup().await;
        let created = service
            .create(&draft_with_upload("Site"))
            .await
            .expect("Failed to create");

        let mut draft = draft_with_upload("Site");
        draft.image = ImageSelection::External {
            url: "https://images.example.com/shot.png".to_string(),
        };

        let updated = service
            .update(created.id, &draft)
            .await
            .expect("Failed to update");

        assert_eq!(store.deleted(), vec!["uploads/1_cover.png"]);
        assert_eq!(
            updated.image_url.as_deref(),
            Some("https://images.example.com/shot.png")
        );
        assert!(updated.image_public_id.is_none());
    }

    #[tokio::test]
    async fn test_edit_without_touching_image_keeps_it() {
        let (service, store) = setup().await;
        let created = service
            .create(&draft_with_upload("Site"))
            .await
            .expect("Failed to create");

        let mut draft = draft_with_upload("Site v2");
        draft.image = ImageSelection::Keep;

        let updated = service
            .update(created.id, &draft)
            .await
            .expect("Failed to update");

        assert!(store.deleted().is_empty());
        assert_eq!(updated.title, "Site v2");
        assert_eq!(updated.image_url, created.image_url);
        assert_eq!(updated.image_public_id, created.image_public_id);
    }

    #[tokio::test]
    async fn test_replacing_upload_releases_previous() {
        let (service, store) = setup().await;
        let created = service
            .create(&draft_with_upload("Site"))
            .await
            .expect("Failed to create");

        let mut draft = draft_with_upload("Site");
        draft.image = ImageSelection::Uploaded {
            url: "/uploads/uploads/2_fresh.png".to_string(),
            public_id: "uploads/2_fresh.png".to_string(),
        };

        let updated = service
            .update(created.id, &draft)
            .await
            .expect("Failed to update");

        assert_eq!(store.deleted(), vec!["uploads/1_cover.png"]);
        assert_eq!(updated.image_public_id.as_deref(), Some("uploads/2_fresh.png"));
    }

    #[tokio::test]
    async fn test_delete_releases_image_then_row() {
        let (service, store) = setup().await;
        let created = service
            .create(&draft_with_upload("Site"))
            .await
            .expect("Failed to create");

        service.delete(created.id).await.expect("Failed to delete");

        assert_eq!(store.deleted(), vec!["uploads/1_cover.png"]);
        assert!(service
            .get(created.id)
            .await
            .expect("Failed to get")
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_project() {
        let (service, _store) = setup().await;

        let result = service.delete(404).await;
        assert!(matches!(result, Err(ContentError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_live_url_becomes_sentinel() {
        let (service, _store) = setup().await;

        let mut draft = draft_with_upload("Site");
        draft.live_url = "  ".to_string();

        let project = service.create(&draft).await.expect("Failed to create");
        assert_eq!(project.live_url, "#");
    }

    #[tokio::test]
    async fn test_update_missing_project() {
        let (service, _store) = setup().await;

        let result = service.update(9999, &draft_with_upload("Ghost")).await;
        assert!(matches!(result, Err(ContentError::NotFound)));
    }
}
