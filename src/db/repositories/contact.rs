//! Contact repository
//!
//! Database operations for contact-form messages. Rows are append-only
//! from the public side; the admin screen lists and deletes them.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Contact, ContactInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Contact repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Persist a submitted message
    async fn create(&self, input: &ContactInput) -> Result<Contact>;

    /// List all messages, newest first
    async fn list(&self) -> Result<Vec<Contact>>;

    /// Delete a message. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count messages (dashboard stats)
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based contact repository implementation
pub struct SqlxContactRepository {
    pool: DynDatabasePool,
}

impl SqlxContactRepository {
    /// Create a new SQLx contact repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn shared(pool: DynDatabasePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, input: &ContactInput) -> Result<Contact> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_contact_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_contact_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Contact>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_contacts_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_contacts_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_contact_sqlite(self.pool.as_sqlite().unwrap(), id).await
            }
            DatabaseDriver::Mysql => delete_contact_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_contacts_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_contacts_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_contact_sqlite(pool: &SqlitePool, input: &ContactInput) -> Result<Contact> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO contacts (user_name, user_email, user_phone, user_subject, message, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.user_name)
    .bind(&input.user_email)
    .bind(&input.user_phone)
    .bind(&input.user_subject)
    .bind(&input.message)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create contact message")?;

    Ok(Contact {
        id: result.last_insert_rowid(),
        user_name: input.user_name.clone(),
        user_email: input.user_email.clone(),
        user_phone: input.user_phone.clone(),
        user_subject: input.user_subject.clone(),
        message: input.message.clone(),
        created_at: now,
    })
}

async fn list_contacts_sqlite(pool: &SqlitePool) -> Result<Vec<Contact>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_name, user_email, user_phone, user_subject, message, created_at
        FROM contacts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list contact messages")?;

    Ok(rows.iter().map(row_to_contact_sqlite).collect())
}

async fn delete_contact_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete contact message")?;

    Ok(result.rows_affected() > 0)
}

async fn count_contacts_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM contacts")
        .fetch_one(pool)
        .await
        .context("Failed to count contact messages")?;

    Ok(row.get("count"))
}

fn row_to_contact_sqlite(row: &sqlx::sqlite::SqliteRow) -> Contact {
    Contact {
        id: row.get("id"),
        user_name: row.get("user_name"),
        user_email: row.get("user_email"),
        user_phone: row.get("user_phone"),
        user_subject: row.get("user_subject"),
        message: row.get("message"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_contact_mysql(pool: &MySqlPool, input: &ContactInput) -> Result<Contact> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO contacts (user_name, user_email, user_phone, user_subject, message, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.user_name)
    .bind(&input.user_email)
    .bind(&input.user_phone)
    .bind(&input.user_subject)
    .bind(&input.message)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create contact message")?;

    Ok(Contact {
        id: result.last_insert_id() as i64,
        user_name: input.user_name.clone(),
        user_email: input.user_email.clone(),
        user_phone: input.user_phone.clone(),
        user_subject: input.user_subject.clone(),
        message: input.message.clone(),
        created_at: now,
    })
}

async fn list_contacts_mysql(pool: &MySqlPool) -> Result<Vec<Contact>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_name, user_email, user_phone, user_subject, message, created_at
        FROM contacts
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list contact messages")?;

    Ok(rows.iter().map(row_to_contact_mysql).collect())
}

async fn delete_contact_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete contact message")?;

    Ok(result.rows_affected() > 0)
}

async fn count_contacts_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM contacts")
        .fetch_one(pool)
        .await
        .context("Failed to count contact messages")?;

    Ok(row.get("count"))
}

fn row_to_contact_mysql(row: &sqlx::mysql::MySqlRow) -> Contact {
    Contact {
        id: row.get("id"),
        user_name: row.get("user_name"),
        user_email: row.get("user_email"),
        user_phone: row.get("user_phone"),
        user_subject: row.get("user_subject"),
        message: row.get("message"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxContactRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxContactRepository::new(pool)
    }

    fn test_input() -> ContactInput {
        ContactInput {
            user_name: "Jane".to_string(),
            user_email: "jane@x.com".to_string(),
            user_phone: "".to_string(),
            user_subject: "Hi".to_string(),
            message: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_contact() {
        let repo = setup_test_repo().await;

        let created = repo.create(&test_input()).await.expect("Failed to create");

        assert!(created.id > 0);
        assert_eq!(created.user_name, "Jane");
        assert_eq!(created.user_email, "jane@x.com");
        assert_eq!(created.user_phone, "");
        assert_eq!(created.user_subject, "Hi");
        assert_eq!(created.message, "Hello");
    }

    #[tokio::test]
    async fn test_list_contacts_newest_first() {
        let repo = setup_test_repo().await;

        for i in 1..=3 {
            let mut input = test_input();
            input.user_subject = format!("Subject {}", i);
            repo.create(&input).await.expect("Failed to create");
            tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
        }

        let messages = repo.list().await.expect("Failed to list");
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].user_subject, "Subject 3");
    }

    #[tokio::test]
    async fn test_delete_contact() {
        let repo = setup_test_repo().await;
        let created = repo.create(&test_input()).await.expect("Failed to create");

        assert!(repo.delete(created.id).await.expect("Failed to delete"));
        assert!(!repo.delete(created.id).await.expect("Failed to delete"));
        assert_eq!(repo.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_count_contacts() {
        let repo = setup_test_repo().await;
        assert_eq!(repo.count().await.expect("count"), 0);

        repo.create(&test_input()).await.expect("Failed to create");
        assert_eq!(repo.count().await.expect("count"), 1);
    }
}
