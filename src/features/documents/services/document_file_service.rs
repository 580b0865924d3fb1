use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::folder_service::FILE_COLUMNS;
use super::FolderService;
use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::DocumentFileResponseDto;
use crate::features::documents::models::DocumentFile;
use crate::features::documents::tree::document_key;
use crate::modules::storage::{purge_objects, ObjectStore};
use crate::shared::constants::{
    ACTION_DELETE, ACTION_DOWNLOAD, ACTION_UPLOAD, ENTITY_DOCUMENT_FILE,
};
use crate::shared::download::FileDownload;
use crate::shared::types::RecordDeletedDto;
use crate::shared::upload::UploadedFile;

/// Service for files stored in the document library
pub struct DocumentFileService {
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    activity: Arc<ActivityService>,
    folders: Arc<FolderService>,
}

impl DocumentFileService {
    pub fn new(
        pool: PgPool,
        store: Arc<dyn ObjectStore>,
        activity: Arc<ActivityService>,
        folders: Arc<FolderService>,
    ) -> Self {
        Self {
            pool,
            store,
            activity,
            folders,
        }
    }

    /// Store an uploaded file. The target folder comes from the form's `folder_id` field.
    pub async fn upload(
        &self,
        file: UploadedFile,
        user: &AuthenticatedUser,
    ) -> Result<DocumentFileResponseDto> {
        let folder_id = match file.field("folder_id").map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| AppError::BadRequest("Invalid folder_id".to_string()))?,
            ),
        };
        if let Some(folder_id) = folder_id {
            self.folders.find(folder_id).await?;
        }

        let file_id = Uuid::new_v4();
        let file_key = document_key(folder_id, file_id, file.extension());
        let checksum = file.checksum();
        let size = file.size();

        self.store
            .put(&file_key, file.data, &file.content_type)
            .await?;

        let inserted = sqlx::query_as::<_, DocumentFile>(&format!(
            r#"
            INSERT INTO document_files
                (id, folder_id, file_key, original_name, file_size, content_type, checksum, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(file_id)
        .bind(folder_id)
        .bind(&file_key)
        .bind(&file.file_name)
        .bind(size)
        .bind(&file.content_type)
        .bind(&checksum)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await;

        let document = match inserted {
            Ok(document) => document,
            Err(e) => {
                if let Err(cleanup) = self.store.remove(&file_key).await {
                    warn!(
                        "Failed to remove orphaned document '{}' after insert error: {}",
                        file_key, cleanup
                    );
                }
                return Err(AppError::from_db(e, "Document already exists"));
            }
        };

        info!("Document {} ({} bytes) uploaded by {}", document.id, size, user.email);

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_UPLOAD)
                    .entity(ENTITY_DOCUMENT_FILE, document.id)
                    .details(document.original_name.clone()),
            )
            .await;

        Ok(document.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<DocumentFileResponseDto> {
        self.find(id).await.map(Into::into)
    }

    pub async fn download(&self, id: Uuid, user: &AuthenticatedUser) -> Result<FileDownload> {
        let document = self.find(id).await?;

        let data = self.store.get(&document.file_key).await?.ok_or_else(|| {
            warn!(
                "Document {} has no stored object at '{}'",
                document.id, document.file_key
            );
            AppError::NotFound("File not found in storage".to_string())
        })?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DOWNLOAD)
                    .entity(ENTITY_DOCUMENT_FILE, id)
                    .details(document.original_name.clone()),
            )
            .await;

        Ok(FileDownload {
            data,
            file_name: document.original_name,
            content_type: document.content_type,
            checksum: Some(document.checksum),
        })
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let document = self.find(id).await?;

        let file_failures =
            purge_objects(self.store.as_ref(), std::slice::from_ref(&document.file_key)).await;

        sqlx::query("DELETE FROM document_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_DOCUMENT_FILE, id)
                    .details(document.original_name),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    async fn find(&self, id: Uuid) -> Result<DocumentFile> {
        sqlx::query_as::<_, DocumentFile>(&format!(
            "SELECT {} FROM document_files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Document {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::search::SearchLimits;
    use crate::shared::test_helpers::{insert_test_user, InMemoryObjectStore};

    fn service(pool: &PgPool, store: Arc<InMemoryObjectStore>) -> DocumentFileService {
        let activity = Arc::new(ActivityService::new(pool.clone(), SearchLimits::new(50, 500)));
        let folders = Arc::new(FolderService::new(
            pool.clone(),
            store.clone(),
            Arc::clone(&activity),
        ));
        DocumentFileService::new(pool.clone(), store, activity, folders)
    }

    fn manual(fields: Vec<(String, String)>) -> UploadedFile {
        UploadedFile {
            data: b"%PDF-1.7 maintenance manual".to_vec(),
            file_name: "amm.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            fields,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upload_then_download_returns_stored_bytes(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let uploaded = service.upload(manual(Vec::new()), &user).await.unwrap();
        assert_eq!(uploaded.folder_id, None);
        assert_eq!(uploaded.file_size, manual(Vec::new()).size());

        let download = service.download(uploaded.id, &user).await.unwrap();
        assert_eq!(download.data, manual(Vec::new()).data);
        assert_eq!(download.file_name, "amm.pdf");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upload_into_missing_folder_is_not_found(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let fields = vec![("folder_id".to_string(), Uuid::new_v4().to_string())];
        let err = service.upload(manual(fields), &user).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let fields = vec![("folder_id".to_string(), "not-a-uuid".to_string())];
        let err = service.upload(manual(fields), &user).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM document_files")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_download_without_stored_object_is_not_found(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let id = Uuid::new_v4();
        let key = document_key(None, id, "pdf");
        sqlx::query(
            r#"
            INSERT INTO document_files
                (id, folder_id, file_key, original_name, file_size, content_type, checksum)
            VALUES ($1, NULL, $2, 'lost.pdf', 10, 'application/pdf', $3)
            "#,
        )
        .bind(id)
        .bind(&key)
        .bind("0".repeat(64))
        .execute(&pool)
        .await
        .unwrap();
        assert!(!store.contains(&key));

        let err = service.download(id, &user).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "File not found in storage"));

        let err = service.download(Uuid::new_v4(), &user).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
