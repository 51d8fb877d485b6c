//! Local filesystem media store
//!
//! Stores objects under a configured root directory and serves them via a
//! public URL prefix. This is the default backend for single-binary
//! deployments where the web server (or a reverse proxy) exposes the
//! upload directory.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use super::{object_path, MediaStore, StorageError, StoredObject};

/// Media store backed by the local filesystem
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    /// Create a new local media store
    pub fn new(root: PathBuf, public_base_url: String) -> Self {
        Self {
            root,
            public_base_url,
        }
    }

    /// Resolve a public_id to a path under the root, rejecting anything
    /// that would escape it.
    fn resolve(&self, public_id: &str) -> Option<PathBuf> {
        let relative = Path::new(public_id);
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }

    fn public_url(&self, public_id: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            public_id
        )
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(
        &self,
        data: &[u8],
        _content_type: &str,
        suggested_name: &str,
    ) -> Result<StoredObject, StorageError> {
        let public_id = object_path(suggested_name);
        let file_path = self
            .resolve(&public_id)
            .ok_or_else(|| StorageError::Write(format!("Invalid object path: {}", public_id)))?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Write(format!("Failed to create directory: {}", e)))?;
        }

        fs::write(&file_path, data)
            .await
            .map_err(|e| StorageError::Write(format!("Failed to write object: {}", e)))?;

        Ok(StoredObject {
            url: self.public_url(&public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), StorageError> {
        let file_path = self
            .resolve(public_id)
            .ok_or_else(|| StorageError::Delete(format!("Invalid object path: {}", public_id)))?;

        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(()),
            // Already gone counts as deleted
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Delete(format!(
                "Failed to remove object: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, LocalMediaStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads".to_string());
        (dir, store)
    }

    #[tokio::test]
    async fn test_upload_writes_file_and_returns_reference() {
        let (dir, store) = test_store();

        let object = store
            .upload(b"png-bytes", "image/png", "cover.png")
            .await
            .expect("Failed to upload");

        assert!(object.public_id.starts_with("uploads/"));
        assert!(object.public_id.ends_with("_cover.png"));
        assert_eq!(object.url, format!("/uploads/{}", object.public_id));

        let on_disk = std::fs::read(dir.path().join(&object.public_id)).expect("Object missing");
        assert_eq!(on_disk, b"png-bytes");
    }

    #[tokio::test]
    async fn test_upload_sanitizes_suggested_name() {
        let (_dir, store) = test_store();

        let object = store
            .upload(b"data", "image/png", "my photo (new).png")
            .await
            .expect("Failed to upload");

        assert!(object.public_id.ends_with("_my_photo__new_.png"));
    }

    #[tokio::test]
    async fn test_delete_removes_object() {
        let (dir, store) = test_store();

        let object = store
            .upload(b"data", "image/png", "gone.png")
            .await
            .expect("Failed to upload");
        assert!(dir.path().join(&object.public_id).exists());

        store.delete(&object.public_id).await.expect("Failed to delete");
        assert!(!dir.path().join(&object.public_id).exists());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, store) = test_store();

        let object = store
            .upload(b"data", "image/png", "twice.png")
            .await
            .expect("Failed to upload");

        store.delete(&object.public_id).await.expect("First delete");
        // Second delete of a missing object still succeeds
        store.delete(&object.public_id).await.expect("Second delete");
        // As does deleting something that never existed
        store
            .delete("uploads/0_never_there.png")
            .await
            .expect("Missing object delete");
    }

    #[tokio::test]
    async fn test_delete_rejects_escaping_paths() {
        let (_dir, store) = test_store();

        let result = store.delete("../outside.txt").await;
        assert!(matches!(result, Err(StorageError::Delete(_))));
    }
}
