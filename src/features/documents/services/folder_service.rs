use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    CreateFolderDto, DocumentFileResponseDto, FolderContentsDto, FolderResponseDto,
    FolderTreeDto, UpdateFolderDto,
};
use crate::features::documents::models::{DocumentFile, DocumentFolder};
use crate::features::documents::tree::{build_tree, check_move};
use crate::modules::storage::{purge_objects, ObjectStore};
use crate::shared::constants::{ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_DOCUMENT_FOLDER};
use crate::shared::types::RecordDeletedDto;

const FOLDER_COLUMNS: &str = "id, parent_id, name, created_by, created_at, updated_at";

pub(super) const FILE_COLUMNS: &str = "id, folder_id, file_key, original_name, file_size, \
    content_type, checksum, uploaded_by, created_at";

const DUPLICATE_NAME: &str = "A folder with this name already exists here";

pub struct FolderService {
    pool: PgPool,
    store: Arc<dyn ObjectStore>,
    activity: Arc<ActivityService>,
}

impl FolderService {
    pub fn new(pool: PgPool, store: Arc<dyn ObjectStore>, activity: Arc<ActivityService>) -> Self {
        Self {
            pool,
            store,
            activity,
        }
    }

    pub async fn create(
        &self,
        dto: CreateFolderDto,
        user: &AuthenticatedUser,
    ) -> Result<FolderResponseDto> {
        if let Some(parent_id) = dto.parent_id {
            self.find(parent_id).await?;
        }

        let folder = sqlx::query_as::<_, DocumentFolder>(&format!(
            r#"
            INSERT INTO document_folders (parent_id, name, created_by)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            FOLDER_COLUMNS
        ))
        .bind(dto.parent_id)
        .bind(dto.name.trim())
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_NAME))?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_DOCUMENT_FOLDER, folder.id)
                    .details(folder.name.clone()),
            )
            .await;

        Ok(folder.into())
    }

    /// Rename and/or move a folder.
    ///
    /// The folder and its new parent stay locked from the cycle check until the
    /// update commits, so two crossing moves cannot both pass the check.
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateFolderDto,
        user: &AuthenticatedUser,
    ) -> Result<FolderResponseDto> {
        let mut tx = self.pool.begin().await?;

        let mut involved = vec![id];
        if let Some(Some(new_parent)) = dto.parent_id {
            involved.push(new_parent);
        }
        let locked = sqlx::query_as::<_, DocumentFolder>(&format!(
            "SELECT {} FROM document_folders WHERE id = ANY($1) ORDER BY id FOR UPDATE",
            FOLDER_COLUMNS
        ))
        .bind(&involved)
        .fetch_all(&mut *tx)
        .await?;

        let current = locked
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Folder {} not found", id)))?;

        let parent_id = match dto.parent_id {
            Some(Some(new_parent)) => {
                let chain = parent_chain(&mut tx, new_parent).await?;
                check_move(id, new_parent, &chain)?;
                Some(new_parent)
            }
            Some(None) => None,
            None => current.parent_id,
        };
        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .unwrap_or(&current.name)
            .to_string();

        let folder = sqlx::query_as::<_, DocumentFolder>(&format!(
            r#"
            UPDATE document_folders
            SET name = $2, parent_id = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FOLDER_COLUMNS
        ))
        .bind(id)
        .bind(&name)
        .bind(parent_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_NAME))?;

        tx.commit().await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_UPDATE)
                    .entity(ENTITY_DOCUMENT_FOLDER, id)
                    .details(folder.name.clone()),
            )
            .await;

        Ok(folder.into())
    }

    /// Delete a folder with its whole subtree
    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let folder = self.find(id).await?;

        let keys = sqlx::query_scalar::<_, String>(
            r#"
            WITH RECURSIVE subtree AS (
                SELECT id FROM document_folders WHERE id = $1
                UNION ALL
                SELECT f.id FROM document_folders f JOIN subtree s ON f.parent_id = s.id
            )
            SELECT file_key FROM document_files WHERE folder_id IN (SELECT id FROM subtree)
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let file_failures = purge_objects(self.store.as_ref(), &keys).await;

        sqlx::query("DELETE FROM document_folders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!(
            "Folder {} deleted with {} stored file(s), {} purge failure(s)",
            id,
            keys.len(),
            file_failures.len()
        );

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_DOCUMENT_FOLDER, id)
                    .details(folder.name),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    /// Direct subfolders and files of a folder, or of the top level
    pub async fn contents(&self, folder_id: Option<Uuid>) -> Result<FolderContentsDto> {
        let folder = match folder_id {
            Some(id) => Some(self.find(id).await?),
            None => None,
        };

        let folders = sqlx::query_as::<_, DocumentFolder>(&format!(
            "SELECT {} FROM document_folders WHERE parent_id IS NOT DISTINCT FROM $1 ORDER BY LOWER(name)",
            FOLDER_COLUMNS
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        let files = sqlx::query_as::<_, DocumentFile>(&format!(
            "SELECT {} FROM document_files WHERE folder_id IS NOT DISTINCT FROM $1 ORDER BY LOWER(original_name)",
            FILE_COLUMNS
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(FolderContentsDto {
            folder: folder.map(Into::into),
            folders: folders.into_iter().map(Into::into).collect(),
            files: files.into_iter().map(DocumentFileResponseDto::from).collect(),
        })
    }

    pub async fn tree(&self) -> Result<Vec<FolderTreeDto>> {
        let folders = sqlx::query_as::<_, DocumentFolder>(&format!(
            "SELECT {} FROM document_folders",
            FOLDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(build_tree(folders))
    }

    pub(super) async fn find(&self, id: Uuid) -> Result<DocumentFolder> {
        sqlx::query_as::<_, DocumentFolder>(&format!(
            "SELECT {} FROM document_folders WHERE id = $1",
            FOLDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Folder {} not found", id)))
    }
}

/// `id` followed by its ancestors, nearest first. Empty when `id` does not exist.
async fn parent_chain(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<Vec<Uuid>> {
    let chain = sqlx::query_scalar::<_, Uuid>(
        r#"
        WITH RECURSIVE chain AS (
            SELECT id, parent_id, 0 AS depth FROM document_folders WHERE id = $1
            UNION ALL
            SELECT f.id, f.parent_id, c.depth + 1
            FROM document_folders f JOIN chain c ON f.id = c.parent_id
        )
        SELECT id FROM chain ORDER BY depth
        "#,
    )
    .bind(id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::search::SearchLimits;
    use crate::shared::test_helpers::{insert_test_user, InMemoryObjectStore};

    fn service(pool: &PgPool) -> FolderService {
        let activity = Arc::new(ActivityService::new(pool.clone(), SearchLimits::new(50, 500)));
        FolderService::new(pool.clone(), Arc::new(InMemoryObjectStore::default()), activity)
    }

    async fn folder(
        service: &FolderService,
        name: &str,
        parent_id: Option<Uuid>,
        user: &AuthenticatedUser,
    ) -> Uuid {
        let dto = CreateFolderDto {
            name: name.to_string(),
            parent_id,
        };
        service.create(dto, user).await.unwrap().id
    }

    fn move_to(parent_id: Option<Uuid>) -> UpdateFolderDto {
        UpdateFolderDto {
            name: None,
            parent_id: Some(parent_id),
        }
    }

    async fn parent_of(pool: &PgPool, id: Uuid) -> Option<Uuid> {
        sqlx::query_scalar("SELECT parent_id FROM document_folders WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_move_under_own_descendant_is_rejected(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool);
        let manuals = folder(&service, "Manuals", None, &user).await;
        let amm = folder(&service, "AMM", Some(manuals), &user).await;
        let chapter = folder(&service, "Chapter 28", Some(amm), &user).await;

        let err = service
            .update(manuals, move_to(Some(chapter)), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = service
            .update(amm, move_to(Some(amm)), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        assert_eq!(parent_of(&pool, manuals).await, None);
        assert_eq!(parent_of(&pool, amm).await, Some(manuals));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reverse_move_after_move_is_rejected(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool);
        let a = folder(&service, "Bulletins", None, &user).await;
        let b = folder(&service, "Directives", None, &user).await;

        let moved = service.update(a, move_to(Some(b)), &user).await.unwrap();
        assert_eq!(moved.parent_id, Some(b));

        let err = service.update(b, move_to(Some(a)), &user).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(parent_of(&pool, b).await, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_crossing_moves_leave_one_applied(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool);
        let a = folder(&service, "Bulletins", None, &user).await;
        let b = folder(&service, "Directives", None, &user).await;

        let (first, second) = tokio::join!(
            service.update(a, move_to(Some(b)), &user),
            service.update(b, move_to(Some(a)), &user),
        );

        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);
        let a_parent = parent_of(&pool, a).await;
        let b_parent = parent_of(&pool, b).await;
        assert!(a_parent.is_none() || b_parent.is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_renames_and_moves_to_top_level(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool);
        let manuals = folder(&service, "Manuals", None, &user).await;
        let amm = folder(&service, "AMM", Some(manuals), &user).await;

        let dto = UpdateFolderDto {
            name: Some("  AMM Rev 12 ".to_string()),
            parent_id: Some(None),
        };
        let updated = service.update(amm, dto, &user).await.unwrap();
        assert_eq!(updated.name, "AMM Rev 12");
        assert_eq!(updated.parent_id, None);

        let renamed = UpdateFolderDto {
            name: Some("Manuals".to_string()),
            parent_id: None,
        };
        let err = service.update(amm, renamed, &user).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_with_missing_folder_or_parent_is_not_found(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool);
        let manuals = folder(&service, "Manuals", None, &user).await;

        let err = service
            .update(Uuid::new_v4(), move_to(None), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = service
            .update(manuals, move_to(Some(Uuid::new_v4())), &user)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
