//! MinIO/S3-compatible storage client
//!
//! Uses rust-s3 crate for lightweight S3 operations. Every key handed in by a
//! service is stored below the configured key prefix.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::ObjectStore;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    key_prefix: String,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Storage(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Storage(format!("Failed to create MinIO bucket: {}", e)))?;

        // Use path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            key_prefix: config.key_prefix,
        };

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}, key_prefix: {}",
            client.endpoint,
            client.bucket.name(),
            client.key_prefix
        );

        Ok(client)
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        match self.create_bucket().await {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    async fn create_bucket(&self) -> Result<(), AppError> {
        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| {
            AppError::Storage(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    fn full_key(&self, key: &str) -> String {
        prefixed_key(&self.key_prefix, key)
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    let key = key.trim_start_matches('/');
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}/{}", prefix, key)
    }
}

fn is_not_found(status: u16, error: Option<&str>) -> bool {
    status == 404
        || error.is_some_and(|e| e.contains("404") || e.contains("NoSuchKey"))
}

#[async_trait]
impl ObjectStore for MinIOClient {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        let full_key = self.full_key(key);
        let response = self
            .bucket
            .put_object_with_content_type(&full_key, &data, content_type)
            .await
            .map_err(|e| {
                AppError::Storage(format!("Failed to upload file '{}': {}", full_key, e))
            })?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Storage(format!(
                "Failed to upload file '{}': HTTP {}",
                full_key,
                response.status_code()
            )));
        }

        debug!(
            "Uploaded file '{}' ({} bytes) to bucket '{}'",
            full_key,
            data.len(),
            self.bucket.name()
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let full_key = self.full_key(key);
        match self.bucket.get_object(&full_key).await {
            Ok(response) if is_not_found(response.status_code(), None) => Ok(None),
            Ok(response) if (200..300).contains(&response.status_code()) => {
                debug!(
                    "Downloaded file '{}' from bucket '{}'",
                    full_key,
                    self.bucket.name()
                );
                Ok(Some(response.bytes().to_vec()))
            }
            Ok(response) => Err(AppError::Storage(format!(
                "Failed to download file '{}': HTTP {}",
                full_key,
                response.status_code()
            ))),
            Err(e) if is_not_found(0, Some(&e.to_string())) => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to download file '{}': {}",
                full_key, e
            ))),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let full_key = self.full_key(key);
        match self.bucket.delete_object(&full_key).await {
            Ok(response)
                if (200..300).contains(&response.status_code())
                    || is_not_found(response.status_code(), None) =>
            {
                debug!(
                    "Deleted file '{}' from bucket '{}'",
                    full_key,
                    self.bucket.name()
                );
                Ok(())
            }
            Ok(response) => Err(AppError::Storage(format!(
                "Failed to delete file '{}': HTTP {}",
                full_key,
                response.status_code()
            ))),
            Err(e) if is_not_found(0, Some(&e.to_string())) => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete file '{}': {}",
                full_key, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        assert_eq!(
            prefixed_key("private", "flight-records/1/a.pdf"),
            "private/flight-records/1/a.pdf"
        );
        assert_eq!(prefixed_key("private", "/docs/a.pdf"), "private/docs/a.pdf");
        assert_eq!(prefixed_key("", "docs/a.pdf"), "docs/a.pdf");
    }

    #[test]
    fn test_is_not_found() {
        assert!(is_not_found(404, None));
        assert!(is_not_found(0, Some("HTTP 404 NoSuchKey")));
        assert!(!is_not_found(500, Some("Internal Error")));
    }
}
