//! Media resolution policy
//!
//! The project and blog forms share one rule set for their cover image.
//! An entity is the sole referent of its uploaded object, so whenever a
//! reference is replaced or dropped, the previous object must be removed
//! from the media store to avoid orphaned storage.
//!
//! Cleanup failures never block the content write: losing an orphaned
//! object is preferable to losing the admin's edit, so failed deletes are
//! logged and swallowed while a failed upload still aborts the submit
//! (uploads happen in the upload endpoint before the form is saved).

use serde::Deserialize;

use crate::storage::{delete_if_present, DynMediaStore};

/// The image choice submitted with a content form.
///
/// Uploads go through the upload endpoint first, so a freshly chosen file
/// arrives here as the `{url, public_id}` pair the endpoint returned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ImageSelection {
    /// A newly uploaded object replaces whatever the entity had
    Uploaded { url: String, public_id: String },
    /// An externally hosted image; the entity stops owning an object
    External { url: String },
    /// Editing without touching the image
    #[default]
    Keep,
}

/// The image fields to persist after applying the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: Option<String>,
    pub public_id: Option<String>,
}

/// Apply the media resolution policy for one form submit.
///
/// | selection | previous image      | action                                      |
/// |-----------|---------------------|---------------------------------------------|
/// | Uploaded  | uploaded object     | delete previous object, use new pair        |
/// | Uploaded  | external / none     | use new pair                                |
/// | Keep      | anything            | keep url/public_id unchanged                |
/// | External  | uploaded object     | delete previous object, clear public_id     |
/// | External  | external / none     | set url, public_id stays absent             |
///
/// Deletes of the previous object are best-effort (logged, swallowed).
pub async fn resolve_image(
    store: &DynMediaStore,
    current_url: Option<&str>,
    current_public_id: Option<&str>,
    selection: &ImageSelection,
) -> ResolvedImage {
    match selection {
        ImageSelection::Uploaded { url, public_id } => {
            // The new object is live; only release the one it replaces
            if current_public_id != Some(public_id.as_str()) {
                release_image(store, current_public_id).await;
            }
            ResolvedImage {
                url: Some(url.clone()),
                public_id: Some(public_id.clone()),
            }
        }
        ImageSelection::External { url } => {
            release_image(store, current_public_id).await;
            ResolvedImage {
                url: if url.is_empty() {
                    None
                } else {
                    Some(url.clone())
                },
                public_id: None,
            }
        }
        ImageSelection::Keep => ResolvedImage {
            url: current_url.map(str::to_string),
            public_id: current_public_id.map(str::to_string),
        },
    }
}

/// Remove an entity's uploaded object, if it has one. Best-effort:
/// failures are logged and swallowed so cleanup never blocks the caller.
pub async fn release_image(store: &DynMediaStore, public_id: Option<&str>) {
    if let Err(e) = delete_if_present(store, public_id).await {
        tracing::warn!("Failed to release media object: {}", e);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::{MediaStore, StorageError, StoredObject};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Test double that records every gateway call
    pub(crate) struct RecordingStore {
        pub uploads: AtomicUsize,
        pub deletes: Mutex<Vec<String>>,
        pub fail_deletes: bool,
    }

    impl RecordingStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                uploads: AtomicUsize::new(0),
                deletes: Mutex::new(Vec::new()),
                fail_deletes: false,
            })
        }

        pub fn failing_deletes() -> Arc<Self> {
            Arc::new(Self {
                uploads: AtomicUsize::new(0),
                deletes: Mutex::new(Vec::new()),
                fail_deletes: true,
            })
        }

        pub fn deleted(&self) -> Vec<String> {
            self.deletes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaStore for RecordingStore {
        async fn upload(
            &self,
            _data: &[u8],
            _content_type: &str,
            suggested_name: &str,
        ) -> Result<StoredObject, StorageError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(StoredObject {
                url: format!("/uploads/uploads/1_{}", suggested_name),
                public_id: format!("uploads/1_{}", suggested_name),
            })
        }

        async fn delete(&self, public_id: &str) -> Result<(), StorageError> {
            self.deletes.lock().unwrap().push(public_id.to_string());
            if self.fail_deletes {
                Err(StorageError::Delete("backend down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn dyn_store(store: &Arc<RecordingStore>) -> DynMediaStore {
        store.clone()
    }

    #[tokio::test]
    async fn test_uploaded_over_uploaded_releases_previous() {
        let store = RecordingStore::new();
        let resolved = resolve_image(
            &dyn_store(&store),
            Some("/uploads/uploads/1_old.png"),
            Some("uploads/1_old.png"),
            &ImageSelection::Uploaded {
                url: "/uploads/uploads/2_new.png".to_string(),
                public_id: "uploads/2_new.png".to_string(),
            },
        )
        .await;

        assert_eq!(store.deleted(), vec!["uploads/1_old.png"]);
        assert_eq!(resolved.url.as_deref(), Some("/uploads/uploads/2_new.png"));
        assert_eq!(resolved.public_id.as_deref(), Some("uploads/2_new.png"));
    }

    #[tokio::test]
    async fn test_uploaded_over_external_deletes_nothing() {
        let store = RecordingStore::new();
        let resolved = resolve_image(
            &dyn_store(&store),
            Some("https://images.example.com/x.png"),
            None,
            &ImageSelection::Uploaded {
                url: "/uploads/uploads/2_new.png".to_string(),
                public_id: "uploads/2_new.png".to_string(),
            },
        )
        .await;

        assert!(store.deleted().is_empty());
        assert_eq!(resolved.public_id.as_deref(), Some("uploads/2_new.png"));
    }

    #[tokio::test]
    async fn test_external_over_uploaded_releases_exactly_once() {
        let store = RecordingStore::new();
        let resolved = resolve_image(
            &dyn_store(&store),
            Some("/uploads/uploads/1_old.png"),
            Some("uploads/1_old.png"),
            &ImageSelection::External {
                url: "https://images.example.com/new.png".to_string(),
            },
        )
        .await;

        assert_eq!(store.deleted(), vec!["uploads/1_old.png"]);
        assert_eq!(
            resolved.url.as_deref(),
            Some("https://images.example.com/new.png")
        );
        assert!(resolved.public_id.is_none());
    }

    #[tokio::test]
    async fn test_keep_leaves_everything_unchanged() {
        let store = RecordingStore::new();
        let resolved = resolve_image(
            &dyn_store(&store),
            Some("/uploads/uploads/1_old.png"),
            Some("uploads/1_old.png"),
            &ImageSelection::Keep,
        )
        .await;

        assert!(store.deleted().is_empty());
        assert_eq!(resolved.url.as_deref(), Some("/uploads/uploads/1_old.png"));
        assert_eq!(resolved.public_id.as_deref(), Some("uploads/1_old.png"));
    }

    #[tokio::test]
    async fn test_external_with_empty_url_clears_image() {
        let store = RecordingStore::new();
        let resolved = resolve_image(
            &dyn_store(&store),
            Some("/uploads/uploads/1_old.png"),
            Some("uploads/1_old.png"),
            &ImageSelection::External {
                url: String::new(),
            },
        )
        .await;

        assert_eq!(store.deleted(), vec!["uploads/1_old.png"]);
        assert!(resolved.url.is_none());
        assert!(resolved.public_id.is_none());
    }

    #[tokio::test]
    async fn test_failed_release_does_not_block_resolution() {
        let store = RecordingStore::failing_deletes();
        let resolved = resolve_image(
            &dyn_store(&store),
            Some("/uploads/uploads/1_old.png"),
            Some("uploads/1_old.png"),
            &ImageSelection::External {
                url: "https://images.example.com/new.png".to_string(),
            },
        )
        .await;

        // The delete was attempted and failed, the new value still lands
        assert_eq!(store.deleted(), vec!["uploads/1_old.png"]);
        assert_eq!(
            resolved.url.as_deref(),
            Some("https://images.example.com/new.png")
        );
    }
}
