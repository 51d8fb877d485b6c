//! Resume service
//!
//! The resume is a singleton record holding one public link, either a
//! freshly uploaded file or an externally hosted URL. Saving checks for
//! an existing row to choose insert vs update.

use serde::Deserialize;
use std::sync::Arc;

use crate::db::repositories::ResumeRepository;
use crate::models::Resume;
use crate::services::{ContentError, FieldError};

/// The resume form: whatever link should be published.
///
/// File uploads go through the upload endpoint first; the resulting URL
/// lands here just like a hand-entered external link would.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeDraft {
    #[serde(default)]
    pub resume_link: String,
}

/// Service for the resume singleton
pub struct ResumeService {
    repo: Arc<dyn ResumeRepository>,
}

impl ResumeService {
    /// Create a new resume service
    pub fn new(repo: Arc<dyn ResumeRepository>) -> Self {
        Self { repo }
    }

    /// Get the current resume, if one was ever saved
    pub async fn get(&self) -> Result<Option<Resume>, ContentError> {
        Ok(self.repo.get().await?)
    }

    /// Save the resume link, inserting the singleton on first save and
    /// updating it afterwards.
    pub async fn save(&self, draft: &ResumeDraft) -> Result<Resume, ContentError> {
        let link = draft.resume_link.trim();
        if link.is_empty() {
            return Err(ContentError::Validation(vec![FieldError::required(
                "resume_link",
            )]));
        }

        match self.repo.get().await? {
            Some(existing) => self
                .repo
                .update(existing.id, link)
                .await?
                .ok_or(ContentError::NotFound),
            None => Ok(self.repo.insert(link).await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxResumeRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> ResumeService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        ResumeService::new(Arc::new(SqlxResumeRepository::new(pool)))
    }

    #[tokio::test]
    async fn test_first_save_inserts() {
        let service = setup().await;
        assert!(service.get().await.expect("get").is_none());

        let saved = service
            .save(&ResumeDraft {
                resume_link: "https://cdn.example.com/resume.pdf".to_string(),
            })
            .await
            .expect("save");

        assert_eq!(saved.resume_link, "https://cdn.example.com/resume.pdf");
    }

    #[tokio::test]
    async fn test_second_save_updates_in_place() {
        let service = setup().await;

        let first = service
            .save(&ResumeDraft {
                resume_link: "https://old.example.com/cv.pdf".to_string(),
            })
            .await
            .expect("save");

        let second = service
            .save(&ResumeDraft {
                resume_link: "https://new.example.com/cv.pdf".to_string(),
            })
            .await
            .expect("save");

        // Still the singleton row, with the new link
        assert_eq!(second.id, first.id);
        assert_eq!(second.resume_link, "https://new.example.com/cv.pdf");

        let current = service.get().await.expect("get").expect("missing");
        assert_eq!(current.id, first.id);
        assert_eq!(current.resume_link, "https://new.example.com/cv.pdf");
    }

    #[tokio::test]
    async fn test_blank_link_rejected() {
        let service = setup().await;

        let result = service
            .save(&ResumeDraft {
                resume_link: "  ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ContentError::Validation(_))));
        assert!(service.get().await.expect("get").is_none());
    }
}
