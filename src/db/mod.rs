//! Database layer
//!
//! This module provides database abstraction for the Folio backend.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for hosted deployments)
//!
//! The database driver is selected based on configuration. Repositories
//! dispatch on the driver at each call site, so the rest of the
//! application only ever sees the `DatabasePool` trait.
//!
//! # Usage
//!
//! ```ignore
//! use folio::config::DatabaseConfig;
//! use folio::db::{create_pool, migrations};
//!
//! let config = DatabaseConfig::default();
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
