//! Project repository
//!
//! Database operations for portfolio projects.
//!
//! This module provides:
//! - `ProjectRepository` trait defining the interface for project data access
//! - `SqlxProjectRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Project, ProjectInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, input: &ProjectInput) -> Result<Project>;

    /// Get project by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;

    /// List all projects, newest first
    async fn list(&self) -> Result<Vec<Project>>;

    /// Replace a project record in full. Returns `None` if the row is gone.
    async fn replace(&self, id: i64, input: &ProjectInput) -> Result<Option<Project>>;

    /// Delete a project. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count projects (dashboard stats)
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based project repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxProjectRepository {
    pool: DynDatabasePool,
}

impl SqlxProjectRepository {
    /// Create a new SQLx project repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn shared(pool: DynDatabasePool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(&self, input: &ProjectInput) -> Result<Project> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_project_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_project_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_project_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => {
                get_project_by_id_mysql(self.pool.as_mysql().unwrap(), id).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Project>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_projects_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_projects_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn replace(&self, id: i64, input: &ProjectInput) -> Result<Option<Project>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                replace_project_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => {
                replace_project_mysql(self.pool.as_mysql().unwrap(), id, input).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_project_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_project_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_projects_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_projects_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

/// Serialize a tech stack for the TEXT column
fn encode_list(items: &[String]) -> Result<String> {
    serde_json::to_string(items).context("Failed to encode string list")
}

/// Deserialize a tech stack from the TEXT column.
/// Malformed stored values degrade to an empty list instead of failing reads.
fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_project_sqlite(pool: &SqlitePool, input: &ProjectInput) -> Result<Project> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO projects (title, description, tech_stack, image_url, image_public_id, live_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(encode_list(&input.tech_stack)?)
    .bind(&input.image_url)
    .bind(&input.image_public_id)
    .bind(&input.live_url)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create project")?;

    let id = result.last_insert_rowid();

    Ok(Project {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        tech_stack: input.tech_stack.clone(),
        image_url: input.image_url.clone(),
        image_public_id: input.image_public_id.clone(),
        live_url: input.live_url.clone(),
        created_at: now,
    })
}

async fn get_project_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Project>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, description, tech_stack, image_url, image_public_id, live_url, created_at
        FROM projects
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get project by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_project_sqlite(&row))),
        None => Ok(None),
    }
}

async fn list_projects_sqlite(pool: &SqlitePool) -> Result<Vec<Project>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, description, tech_stack, image_url, image_public_id, live_url, created_at
        FROM projects
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list projects")?;

    Ok(rows.iter().map(row_to_project_sqlite).collect())
}

async fn replace_project_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &ProjectInput,
) -> Result<Option<Project>> {
    let result = sqlx::query(
        r#"
        UPDATE projects
        SET title = ?, description = ?, tech_stack = ?, image_url = ?, image_public_id = ?, live_url = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(encode_list(&input.tech_stack)?)
    .bind(&input.image_url)
    .bind(&input.image_public_id)
    .bind(&input.live_url)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update project")?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_project_by_id_sqlite(pool, id).await
}

async fn delete_project_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete project")?;

    Ok(result.rows_affected() > 0)
}

async fn count_projects_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM projects")
        .fetch_one(pool)
        .await
        .context("Failed to count projects")?;

    Ok(row.get("count"))
}

fn row_to_project_sqlite(row: &sqlx::sqlite::SqliteRow) -> Project {
    let tech_stack: String = row.get("tech_stack");
    Project {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        tech_stack: decode_list(&tech_stack),
        image_url: row.get("image_url"),
        image_public_id: row.get("image_public_id"),
        live_url: row.get("live_url"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_project_mysql(pool: &MySqlPool, input: &ProjectInput) -> Result<Project> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO projects (title, description, tech_stack, image_url, image_public_id, live_url, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(encode_list(&input.tech_stack)?)
    .bind(&input.image_url)
    .bind(&input.image_public_id)
    .bind(&input.live_url)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create project")?;

    let id = result.last_insert_id() as i64;

    Ok(Project {
        id,
        title: input.title.clone(),
        description: input.description.clone(),
        tech_stack: input.tech_stack.clone(),
        image_url: input.image_url.clone(),
        image_public_id: input.image_public_id.clone(),
        live_url: input.live_url.clone(),
        created_at: now,
    })
}

async fn get_project_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Project>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, description, tech_stack, image_url, image_public_id, live_url, created_at
        FROM projects
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get project by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_project_mysql(&row))),
        None => Ok(None),
    }
}

async fn list_projects_mysql(pool: &MySqlPool) -> Result<Vec<Project>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, description, tech_stack, image_url, image_public_id, live_url, created_at
        FROM projects
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list projects")?;

    Ok(rows.iter().map(row_to_project_mysql).collect())
}

async fn replace_project_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &ProjectInput,
) -> Result<Option<Project>> {
    let existing = get_project_by_id_mysql(pool, id).await?;
    if existing.is_none() {
        return Ok(None);
    }

    sqlx::query(
        r#"
        UPDATE projects
        SET title = ?, description = ?, tech_stack = ?, image_url = ?, image_public_id = ?, live_url = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(encode_list(&input.tech_stack)?)
    .bind(&input.image_url)
    .bind(&input.image_public_id)
    .bind(&input.live_url)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update project")?;

    get_project_by_id_mysql(pool, id).await
}

async fn delete_project_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete project")?;

    Ok(result.rows_affected() > 0)
}

async fn count_projects_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM projects")
        .fetch_one(pool)
        .await
        .context("Failed to count projects")?;

    Ok(row.get("count"))
}

fn row_to_project_mysql(row: &sqlx::mysql::MySqlRow) -> Project {
    let tech_stack: String = row.get("tech_stack");
    Project {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        tech_stack: decode_list(&tech_stack),
        image_url: row.get("image_url"),
        image_public_id: row.get("image_public_id"),
        live_url: row.get("live_url"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxProjectRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxProjectRepository::new(pool)
    }

    fn test_input(title: &str) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            description: format!("Description for {}", title),
            tech_stack: vec!["Rust".to_string(), "Axum".to_string()],
            image_url: Some("https://cdn.example.com/p.png".to_string()),
            image_public_id: Some("uploads/123_p.png".to_string()),
            live_url: "https://example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_project() {
        let repo = setup_test_repo().await;

        let created = repo
            .create(&test_input("Test Project"))
            .await
            .expect("Failed to create project");

        assert!(created.id > 0);
        assert_eq!(created.title, "Test Project");
        assert_eq!(created.tech_stack, vec!["Rust", "Axum"]);
        assert_eq!(created.image_public_id.as_deref(), Some("uploads/123_p.png"));
    }

    #[tokio::test]
    async fn test_get_project_by_id() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&test_input("Find Me"))
            .await
            .expect("Failed to create project");

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get project")
            .expect("Project not found");

        assert_eq!(found.id, created.id);
        assert_eq!(found.title, "Find Me");
        assert_eq!(found.tech_stack, vec!["Rust", "Axum"]);
    }

    #[tokio::test]
    async fn test_get_project_by_id_not_found() {
        let repo = setup_test_repo().await;

        let found = repo.get_by_id(99999).await.expect("Failed to get project");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_projects_newest_first() {
        let repo = setup_test_repo().await;

        for i in 1..=3 {
            repo.create(&test_input(&format!("Project {}", i)))
                .await
                .expect("Failed to create project");
            tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
        }

        let projects = repo.list().await.expect("Failed to list projects");

        assert_eq!(projects.len(), 3);
        for i in 0..projects.len() - 1 {
            assert!(projects[i].created_at >= projects[i + 1].created_at);
        }
    }

    #[tokio::test]
    async fn test_replace_project_is_full_replace() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&test_input("Before"))
            .await
            .expect("Failed to create project");

        let replacement = ProjectInput {
            title: "After".to_string(),
            description: "New description".to_string(),
            tech_stack: vec!["Go".to_string()],
            image_url: Some("https://images.example.com/ext.png".to_string()),
            image_public_id: None,
            live_url: "#".to_string(),
        };

        let updated = repo
            .replace(created.id, &replacement)
            .await
            .expect("Failed to replace project")
            .expect("Project disappeared");

        assert_eq!(updated.title, "After");
        assert_eq!(updated.tech_stack, vec!["Go"]);
        assert!(updated.image_public_id.is_none());
        assert_eq!(updated.live_url, "#");
        // Creation timestamp is immutable
        assert_eq!(
            updated.created_at.timestamp(),
            created.created_at.timestamp()
        );
    }

    #[tokio::test]
    async fn test_replace_missing_project_returns_none() {
        let repo = setup_test_repo().await;

        let result = repo
            .replace(12345, &test_input("Ghost"))
            .await
            .expect("Replace should not error");

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_project() {
        let repo = setup_test_repo().await;
        let created = repo
            .create(&test_input("To Delete"))
            .await
            .expect("Failed to create project");

        let deleted = repo.delete(created.id).await.expect("Failed to delete");
        assert!(deleted);

        let found = repo.get_by_id(created.id).await.expect("Failed to get");
        assert!(found.is_none());

        // Deleting again reports no row removed
        let deleted = repo.delete(created.id).await.expect("Failed to delete");
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_count_projects() {
        let repo = setup_test_repo().await;

        assert_eq!(repo.count().await.expect("count"), 0);

        for i in 1..=2 {
            repo.create(&test_input(&format!("Project {}", i)))
                .await
                .expect("Failed to create project");
        }

        assert_eq!(repo.count().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn test_tech_stack_round_trip() {
        let repo = setup_test_repo().await;

        let mut input = test_input("Tags");
        input.tech_stack = vec![
            "React".to_string(),
            "Next.js".to_string(),
            "AI".to_string(),
        ];

        let created = repo.create(&input).await.expect("Failed to create");
        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get")
            .expect("missing");

        assert_eq!(found.tech_stack, vec!["React", "Next.js", "AI"]);
    }
}
