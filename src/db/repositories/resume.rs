//! Resume repository
//!
//! Database operations for the resume singleton. The table is expected to
//! hold at most one row; `get` returns the oldest row so a stray duplicate
//! cannot flip the link back and forth.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Resume;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Resume repository trait
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    /// Get the resume record, if one has been saved
    async fn get(&self) -> Result<Option<Resume>>;

    /// Insert the first resume record
    async fn insert(&self, resume_link: &str) -> Result<Resume>;

    /// Update the existing resume record. Returns `None` if the row is gone.
    async fn update(&self, id: i64, resume_link: &str) -> Result<Option<Resume>>;
}

/// SQLx-based resume repository implementation
pub struct SqlxResumeRepository {
    pool: DynDatabasePool,
}

impl SqlxResumeRepository {
    /// Create a new SQLx resume repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn shared(pool: DynDatabasePool) -> Arc<dyn ResumeRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ResumeRepository for SqlxResumeRepository {
    async fn get(&self) -> Result<Option<Resume>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_resume_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => get_resume_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn insert(&self, resume_link: &str) -> Result<Resume> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                insert_resume_sqlite(self.pool.as_sqlite().unwrap(), resume_link).await
            }
            DatabaseDriver::Mysql => {
                insert_resume_mysql(self.pool.as_mysql().unwrap(), resume_link).await
            }
        }
    }

    async fn update(&self, id: i64, resume_link: &str) -> Result<Option<Resume>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_resume_sqlite(self.pool.as_sqlite().unwrap(), id, resume_link).await
            }
            DatabaseDriver::Mysql => {
                update_resume_mysql(self.pool.as_mysql().unwrap(), id, resume_link).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn get_resume_sqlite(pool: &SqlitePool) -> Result<Option<Resume>> {
    let row = sqlx::query(
        "SELECT id, resume_link, updated_at FROM resumes ORDER BY id ASC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("Failed to get resume")?;

    Ok(row.map(|row| Resume {
        id: row.get("id"),
        resume_link: row.get("resume_link"),
        updated_at: row.get("updated_at"),
    }))
}

async fn insert_resume_sqlite(pool: &SqlitePool, resume_link: &str) -> Result<Resume> {
    let now = Utc::now();
    let result = sqlx::query("INSERT INTO resumes (resume_link, updated_at) VALUES (?, ?)")
        .bind(resume_link)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to insert resume")?;

    Ok(Resume {
        id: result.last_insert_rowid(),
        resume_link: resume_link.to_string(),
        updated_at: now,
    })
}

async fn update_resume_sqlite(
    pool: &SqlitePool,
    id: i64,
    resume_link: &str,
) -> Result<Option<Resume>> {
    let now = Utc::now();
    let result = sqlx::query("UPDATE resumes SET resume_link = ?, updated_at = ? WHERE id = ?")
        .bind(resume_link)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update resume")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Resume {
        id,
        resume_link: resume_link.to_string(),
        updated_at: now,
    }))
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn get_resume_mysql(pool: &MySqlPool) -> Result<Option<Resume>> {
    let row = sqlx::query(
        "SELECT id, resume_link, updated_at FROM resumes ORDER BY id ASC LIMIT 1",
    )
    .fetch_optional(pool)
    .await
    .context("Failed to get resume")?;

    Ok(row.map(|row| Resume {
        id: row.get("id"),
        resume_link: row.get("resume_link"),
        updated_at: row.get("updated_at"),
    }))
}

async fn insert_resume_mysql(pool: &MySqlPool, resume_link: &str) -> Result<Resume> {
    let now = Utc::now();
    let result = sqlx::query("INSERT INTO resumes (resume_link, updated_at) VALUES (?, ?)")
        .bind(resume_link)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to insert resume")?;

    Ok(Resume {
        id: result.last_insert_id() as i64,
        resume_link: resume_link.to_string(),
        updated_at: now,
    })
}

async fn update_resume_mysql(
    pool: &MySqlPool,
    id: i64,
    resume_link: &str,
) -> Result<Option<Resume>> {
    let now = Utc::now();
    let result = sqlx::query("UPDATE resumes SET resume_link = ?, updated_at = ? WHERE id = ?")
        .bind(resume_link)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update resume")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    Ok(Some(Resume {
        id,
        resume_link: resume_link.to_string(),
        updated_at: now,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxResumeRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxResumeRepository::new(pool)
    }

    #[tokio::test]
    async fn test_get_before_first_save() {
        let repo = setup_test_repo().await;

        let resume = repo.get().await.expect("Failed to get resume");
        assert!(resume.is_none());
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let repo = setup_test_repo().await;

        let inserted = repo
            .insert("https://cdn.example.com/resume.pdf")
            .await
            .expect("Failed to insert");

        let fetched = repo
            .get()
            .await
            .expect("Failed to get resume")
            .expect("Resume missing");
        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.resume_link, "https://cdn.example.com/resume.pdf");
    }

    #[tokio::test]
    async fn test_update_existing() {
        let repo = setup_test_repo().await;
        let inserted = repo.insert("https://old.example.com/cv.pdf").await.expect("insert");

        let updated = repo
            .update(inserted.id, "https://new.example.com/cv.pdf")
            .await
            .expect("Failed to update")
            .expect("Row disappeared");

        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.resume_link, "https://new.example.com/cv.pdf");
        assert!(updated.updated_at >= inserted.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = setup_test_repo().await;

        let result = repo
            .update(777, "https://example.com/cv.pdf")
            .await
            .expect("Update should not error");
        assert!(result.is_none());
    }
}
