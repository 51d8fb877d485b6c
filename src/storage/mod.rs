//! Media storage layer
//!
//! This module provides the gateway for binary media objects (cover
//! images, resume PDFs). It supports:
//! - Local filesystem storage (default, for single-binary deployment)
//! - S3-compatible bucket storage - optional, behind the `s3-storage` feature
//!
//! The storage driver is selected based on configuration.
//!
//! An uploaded object is addressed by its `public_id`, which is exactly
//! the storage path, so callers can delete an object from nothing but the
//! persisted identifier.

pub mod local;

#[cfg(feature = "s3-storage")]
pub mod bucket;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::{StorageConfig, StorageDriver};

pub use local::LocalMediaStore;

#[cfg(feature = "s3-storage")]
pub use bucket::BucketMediaStore;

/// Error type for media storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The object could not be written (quota, network, permissions)
    #[error("Failed to store object: {0}")]
    Write(String),
    /// The object could not be deleted. A missing object is not an error;
    /// only genuine backend failures land here.
    #[error("Failed to delete object: {0}")]
    Delete(String),
}

/// A stored media object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Publicly reachable URL of the object
    pub url: String,
    /// Storage path, used later for deletion
    pub public_id: String,
}

/// Media store trait
///
/// Implementations write whole objects and delete them by `public_id`.
/// Deletes are idempotent: removing an object that is already gone
/// succeeds.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an object and return its public URL and storage path
    async fn upload(
        &self,
        data: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Remove an object. Missing objects are treated as already deleted.
    async fn delete(&self, public_id: &str) -> Result<(), StorageError>;
}

/// Type alias for a shared media store
pub type DynMediaStore = Arc<dyn MediaStore>;

/// Delete an object if the caller actually holds a reference to one.
///
/// Entity rows keep `public_id` nullable (external image URLs have none),
/// and cleanup sites pass whatever they have. Absent or empty references
/// are a no-op.
pub async fn delete_if_present(
    store: &DynMediaStore,
    public_id: Option<&str>,
) -> Result<(), StorageError> {
    match public_id {
        Some(id) if !id.is_empty() => store.delete(id).await,
        _ => Ok(()),
    }
}

/// Create a media store based on configuration.
pub fn create_store(config: &StorageConfig) -> Result<DynMediaStore> {
    match config.driver {
        StorageDriver::Local => Ok(Arc::new(LocalMediaStore::new(
            config.root.clone(),
            config.public_base_url.clone(),
        ))),
        #[cfg(feature = "s3-storage")]
        StorageDriver::S3 => Ok(Arc::new(BucketMediaStore::from_config(config)?)),
        #[cfg(not(feature = "s3-storage"))]
        StorageDriver::S3 => anyhow::bail!(
            "Storage driver 's3' requires a build with the 's3-storage' feature"
        ),
    }
}

/// Build the storage path for a new object: a millisecond timestamp plus
/// the sanitized filename, under the `uploads/` prefix. The timestamp
/// keeps repeated uploads of the same file from colliding.
pub fn object_path(suggested_name: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("uploads/{}_{}", millis, sanitize_filename(suggested_name))
}

/// Replace everything but ASCII alphanumerics and dots, so the name is
/// safe as a path segment on every backend.
pub fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}
