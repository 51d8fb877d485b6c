//! S3-compatible bucket media store
//!
//! Stores objects in an S3-compatible bucket (AWS S3, MinIO, Supabase
//! storage and friends). Enabled with the `s3-storage` cargo feature and
//! selected with the `s3` storage driver.

use anyhow::{Context, Result};
use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use super::{object_path, MediaStore, StorageError, StoredObject};
use crate::config::StorageConfig;

/// Media store backed by an S3-compatible bucket
pub struct BucketMediaStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl BucketMediaStore {
    /// Build a bucket store from configuration.
    ///
    /// Requires `bucket`; `region` defaults to `us-east-1`. A custom
    /// `endpoint` switches to path-style addressing, which is what
    /// non-AWS providers expect.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let name = config
            .bucket
            .as_deref()
            .context("Storage driver 's3' requires a bucket name")?;

        let region_name = config
            .region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: region_name,
                endpoint: endpoint.clone(),
            },
            None => region_name
                .parse()
                .context("Invalid storage region")?,
        };

        let credentials = Credentials::new(
            config.access_key.as_deref(),
            config.secret_key.as_deref(),
            None,
            None,
            None,
        )
        .context("Failed to build storage credentials")?;

        let mut bucket =
            Bucket::new(name, region, credentials).context("Failed to open storage bucket")?;
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self {
            bucket,
            public_base_url: config.public_base_url.clone(),
        })
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
impl MediaStore for BucketMediaStore {
    async fn upload(
        &self,
        data: &[u8],
        content_type: &str,
        suggested_name: &str,
    ) -> Result<StoredObject, StorageError> {
        let public_id = object_path(suggested_name);

        let response = self
            .bucket
            .put_object_with_content_type(&public_id, data, content_type)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(StorageError::Write(format!(
                "Bucket returned status {}",
                response.status_code()
            )));
        }

        Ok(StoredObject {
            url: self.public_url(&public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), StorageError> {
        let response = self
            .bucket
            .delete_object(public_id)
            .await
            .map_err(|e| StorageError::Delete(e.to_string()))?;

        // Already-gone objects count as deleted
        match response.status_code() {
            code if (200..300).contains(&code) => Ok(()),
            404 => Ok(()),
            code => Err(StorageError::Delete(format!(
                "Bucket returned status {}",
                code
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageDriver;

    fn s3_config() -> StorageConfig {
        StorageConfig {
            driver: StorageDriver::S3,
            bucket: Some("portfolio".to_string()),
            region: Some("eu-central-1".to_string()),
            endpoint: Some("http://localhost:9000".to_string()),
            access_key: Some("minio".to_string()),
            secret_key: Some("minio123".to_string()),
            public_base_url: "https://cdn.example.com".to_string(),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn test_from_config_requires_bucket() {
        let mut config = s3_config();
        config.bucket = None;

        assert!(BucketMediaStore::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_builds_store() {
        let store = BucketMediaStore::from_config(&s3_config()).expect("Failed to build store");
        assert_eq!(
            store.public_url("uploads/1_a.png"),
            "https://cdn.example.com/uploads/1_a.png"
        );
    }
}
