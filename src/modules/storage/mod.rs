//! Storage module for file management
//!
//! Record attachments and library documents live in an S3-compatible bucket.
//! Services talk to the `ObjectStore` trait; `MinIOClient` is the production
//! implementation built in `main`.

mod minio_client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::AppError;

pub use minio_client::MinIOClient;

/// Byte-oriented object storage addressed by opaque keys
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    /// Fetch an object; `Ok(None)` when the key does not exist
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Remove an object. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/// A stored object that could not be removed during cleanup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileFailure {
    pub file_key: String,
    pub error: String,
}

/// Remove every key, continuing past failures.
///
/// Returns the keys that could not be removed. Callers go on to delete
/// their database rows regardless.
pub async fn purge_objects(store: &dyn ObjectStore, keys: &[String]) -> Vec<FileFailure> {
    let mut failures = Vec::new();

    for key in keys {
        if let Err(e) = store.remove(key).await {
            tracing::warn!("Failed to remove stored object '{}': {}", key, e);
            failures.push(FileFailure {
                file_key: key.clone(),
                error: e.to_string(),
            });
        }
    }

    if !keys.is_empty() {
        tracing::debug!(
            "Purged {} of {} stored objects",
            keys.len() - failures.len(),
            keys.len()
        );
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryObjectStore;

    #[tokio::test]
    async fn test_purge_continues_past_failures() {
        let store = InMemoryObjectStore::failing_on(&["stock-inventory/1/b.pdf"]);
        store.insert("stock-inventory/1/a.pdf", b"a");
        store.insert("stock-inventory/1/b.pdf", b"b");
        store.insert("stock-inventory/1/c.pdf", b"c");

        let keys = vec![
            "stock-inventory/1/a.pdf".to_string(),
            "stock-inventory/1/b.pdf".to_string(),
            "stock-inventory/1/c.pdf".to_string(),
        ];
        let failures = purge_objects(&store, &keys).await;

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].file_key, "stock-inventory/1/b.pdf");
        assert!(!store.contains("stock-inventory/1/a.pdf"));
        assert!(store.contains("stock-inventory/1/b.pdf"));
        assert!(!store.contains("stock-inventory/1/c.pdf"));
    }

    #[tokio::test]
    async fn test_purge_of_nothing_reports_nothing() {
        let store = InMemoryObjectStore::default();
        assert!(purge_objects(&store, &[]).await.is_empty());
    }
}
