use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::dtos::AttachmentResponseDto;
use crate::features::attachments::models::Attachment;
use crate::features::attachments::AttachmentKind;
use crate::features::auth::model::AuthenticatedUser;
use crate::modules::storage::{purge_objects, FileFailure, ObjectStore};
use crate::shared::constants::{ACTION_DELETE, ACTION_DOWNLOAD, ACTION_UPLOAD};
use crate::shared::download::FileDownload;
use crate::shared::upload::UploadedFile;

const ATTACHMENT_COLUMNS: &str = "id, owner_id, file_key, original_name, file_size, \
                                  content_type, checksum, uploaded_by, created_at";

/// Service for attachments of every record family
pub struct AttachmentService {
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    activity: Arc<ActivityService>,
}

impl AttachmentService {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, activity: Arc<ActivityService>) -> Self {
        Self {
            pool,
            store,
            activity,
        }
    }

    pub async fn upload(
        &self,
        kind: AttachmentKind,
        owner_id: Uuid,
        file: UploadedFile,
        user: &AuthenticatedUser,
    ) -> Result<AttachmentResponseDto> {
        self.ensure_owner_exists(kind, owner_id).await?;

        let file_key = kind.object_key(owner_id, Uuid::new_v4(), file.extension());
        let checksum = file.checksum();
        let size = file.size();

        self.store
            .put(&file_key, file.data, &file.content_type)
            .await?;

        let inserted = sqlx::query_as::<_, Attachment>(&format!(
            r#"
            INSERT INTO {} (owner_id, file_key, original_name, file_size, content_type, checksum, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            kind.attachment_table(),
            ATTACHMENT_COLUMNS
        ))
        .bind(owner_id)
        .bind(&file_key)
        .bind(&file.file_name)
        .bind(size)
        .bind(&file.content_type)
        .bind(&checksum)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await;

        let attachment = match inserted {
            Ok(attachment) => attachment,
            Err(e) => {
                if let Err(cleanup) = self.store.remove(&file_key).await {
                    warn!(
                        "Failed to remove orphaned object '{}' after insert error: {}",
                        file_key, cleanup
                    );
                }
                return Err(AppError::from_db(e, "Attachment already exists"));
            }
        };

        info!(
            "Attachment {} ({} bytes) added to {} {}",
            attachment.id,
            size,
            kind.slug(),
            owner_id
        );

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_UPLOAD)
                    .entity(kind.entity_type(), owner_id)
                    .details(attachment.original_name.clone()),
            )
            .await;

        Ok(AttachmentResponseDto::from_model(kind, attachment))
    }

    pub async fn list(
        &self,
        kind: AttachmentKind,
        owner_id: Uuid,
    ) -> Result<Vec<AttachmentResponseDto>> {
        self.ensure_owner_exists(kind, owner_id).await?;

        let rows = sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {} FROM {} WHERE owner_id = $1 ORDER BY created_at DESC",
            ATTACHMENT_COLUMNS,
            kind.attachment_table()
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|a| AttachmentResponseDto::from_model(kind, a))
            .collect())
    }

    pub async fn download(
        &self,
        kind: AttachmentKind,
        owner_id: Uuid,
        attachment_id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<FileDownload> {
        let attachment = self.find(kind, owner_id, attachment_id).await?;

        let data = self.store.get(&attachment.file_key).await?.ok_or_else(|| {
            warn!(
                "Attachment {} has no stored object at '{}'",
                attachment.id, attachment.file_key
            );
            AppError::NotFound("File not found in storage".to_string())
        })?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DOWNLOAD)
                    .entity(kind.entity_type(), owner_id)
                    .details(attachment.original_name.clone()),
            )
            .await;

        Ok(FileDownload {
            data,
            file_name: attachment.original_name,
            content_type: attachment.content_type,
            checksum: Some(attachment.checksum),
        })
    }

    /// Remove the stored object (best effort) and then the row
    pub async fn delete(
        &self,
        kind: AttachmentKind,
        owner_id: Uuid,
        attachment_id: Uuid,
        user: &AuthenticatedUser,
    ) -> Result<()> {
        let attachment = self.find(kind, owner_id, attachment_id).await?;

        purge_objects(self.store.as_ref(), std::slice::from_ref(&attachment.file_key)).await;

        sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1",
            kind.attachment_table()
        ))
        .bind(attachment.id)
        .execute(&self.pool)
        .await?;

        debug!("Attachment {} removed from {} {}", attachment.id, kind.slug(), owner_id);

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(kind.entity_type(), owner_id)
                    .details(attachment.original_name),
            )
            .await;

        Ok(())
    }

    /// Storage keys of every attachment owned by the given records
    pub async fn file_keys_for(&self, kind: AttachmentKind, owner_ids: &[Uuid]) -> Result<Vec<String>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys = sqlx::query_scalar::<_, String>(&format!(
            "SELECT file_key FROM {} WHERE owner_id = ANY($1)",
            kind.attachment_table()
        ))
        .bind(owner_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(keys)
    }

    /// Purge stored objects of the given records ahead of deleting them.
    ///
    /// The attachment rows themselves go with their owner through the FK cascade.
    pub async fn purge_for_owners(
        &self,
        kind: AttachmentKind,
        owner_ids: &[Uuid],
    ) -> Result<Vec<FileFailure>> {
        let keys = self.file_keys_for(kind, owner_ids).await?;
        Ok(purge_objects(self.store.as_ref(), &keys).await)
    }

    async fn ensure_owner_exists(&self, kind: AttachmentKind, owner_id: Uuid) -> Result<()> {
        let exists = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            kind.parent_table()
        ))
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("{} record not found", kind.slug())))
        }
    }

    async fn find(
        &self,
        kind: AttachmentKind,
        owner_id: Uuid,
        attachment_id: Uuid,
    ) -> Result<Attachment> {
        sqlx::query_as::<_, Attachment>(&format!(
            "SELECT {} FROM {} WHERE id = $1 AND owner_id = $2",
            ATTACHMENT_COLUMNS,
            kind.attachment_table()
        ))
        .bind(attachment_id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Attachment not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::search::SearchLimits;
    use crate::shared::test_helpers::{insert_test_user, InMemoryObjectStore};

    fn service(pool: &PgPool, store: Arc<InMemoryObjectStore>) -> AttachmentService {
        let activity = Arc::new(ActivityService::new(pool.clone(), SearchLimits::new(50, 500)));
        AttachmentService::new(pool.clone(), store, activity)
    }

    fn certificate() -> UploadedFile {
        UploadedFile {
            data: b"%PDF-1.7 release certificate".to_vec(),
            file_name: "cert.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            fields: Vec::new(),
        }
    }

    async fn insert_stock(pool: &PgPool) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO stock_inventory (part_no, description) VALUES ('PN-100', 'Fuel pump') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upload_to_missing_owner_is_not_found(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let err = service
            .upload(AttachmentKind::StockInventory, Uuid::new_v4(), certificate(), &user)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_inventory_attachments")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upload_then_download_returns_stored_bytes(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let owner = insert_stock(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let uploaded = service
            .upload(AttachmentKind::StockInventory, owner, certificate(), &user)
            .await
            .unwrap();
        assert_eq!(uploaded.original_name, "cert.pdf");
        assert_eq!(uploaded.checksum, certificate().checksum());

        let download = service
            .download(AttachmentKind::StockInventory, owner, uploaded.id, &user)
            .await
            .unwrap();
        assert_eq!(download.data, certificate().data);
        assert_eq!(download.content_type, "application/pdf");

        // Attachment ids are scoped to their owner
        let err = service
            .download(AttachmentKind::StockInventory, Uuid::new_v4(), uploaded.id, &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "Attachment not found"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_download_without_stored_object_is_not_found(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let owner = insert_stock(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let key = format!("stock-inventory/{}/lost.pdf", owner);
        let attachment_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO stock_inventory_attachments
                (owner_id, file_key, original_name, file_size, content_type, checksum)
            VALUES ($1, $2, 'lost.pdf', 10, 'application/pdf', $3)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(&key)
        .bind("0".repeat(64))
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(!store.contains(&key));

        let err = service
            .download(AttachmentKind::StockInventory, owner, attachment_id, &user)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == "File not found in storage"));
    }
}
