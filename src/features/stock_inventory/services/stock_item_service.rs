use sqlx::PgPool;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use super::cascade::{orphan_inspections, partition_found, refresh_inspections};
use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::{AttachmentKind, AttachmentService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::stock_inventory::dtos::{
    CreateStockItemDto, StockItemQueryParams, StockItemResponseDto, UpdateStockItemDto,
};
use crate::features::stock_inventory::models::{OrphanSnapshot, StockItem};
use crate::shared::constants::{
    ACTION_BULK_DELETE, ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_STOCK_INVENTORY,
    MAX_BULK_DELETE_IDS,
};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::{BulkDeleteResultDto, RecordDeletedDto};

const STOCK_COLUMNS: &str = "id, part_no, serial_no, description, quantity, unit, location, \
    status, received_date, remarks, created_by, created_at, updated_at";

/// Service for stock inventory records
pub struct StockItemService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    attachments: Arc<AttachmentService>,
}

impl StockItemService {
    pub fn new(
        pool: PgPool,
        limits: SearchLimits,
        activity: Arc<ActivityService>,
        attachments: Arc<AttachmentService>,
    ) -> Self {
        Self {
            pool,
            limits,
            activity,
            attachments,
        }
    }

    pub async fn create(
        &self,
        dto: CreateStockItemDto,
        user: &AuthenticatedUser,
    ) -> Result<StockItemResponseDto> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            INSERT INTO stock_inventory
                (part_no, serial_no, description, quantity, unit, location, status,
                 received_date, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            STOCK_COLUMNS
        ))
        .bind(dto.part_no.trim())
        .bind(&dto.serial_no)
        .bind(&dto.description)
        .bind(dto.quantity)
        .bind(&dto.unit)
        .bind(&dto.location)
        .bind(&dto.status)
        .bind(dto.received_date)
        .bind(&dto.remarks)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Stock record already exists"))?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_STOCK_INVENTORY, item.id)
                    .details(format!("P/N {}", item.part_no)),
            )
            .await;

        Ok(item.into())
    }

    pub async fn search(&self, params: &StockItemQueryParams) -> Result<Vec<StockItemResponseDto>> {
        let filters = TextFilters::new()
            .with("part_no", params.part_no.as_deref())
            .with("serial_no", params.serial_no.as_deref())
            .with("description", params.description.as_deref())
            .with("location", params.location.as_deref())
            .with("status", params.status.as_deref());

        let mut qb = build_search_query(
            STOCK_COLUMNS,
            "stock_inventory",
            &filters,
            "created_at DESC",
            self.limits,
        );

        let items: Vec<StockItem> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<StockItemResponseDto> {
        self.find(id).await.map(Into::into)
    }

    /// Update the record and mirror part identity changes onto linked inspections
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateStockItemDto,
        user: &AuthenticatedUser,
    ) -> Result<StockItemResponseDto> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, StockItem>(&format!(
            r#"
            UPDATE stock_inventory
            SET part_no = COALESCE($2, part_no),
                serial_no = COALESCE($3, serial_no),
                description = COALESCE($4, description),
                quantity = COALESCE($5, quantity),
                unit = COALESCE($6, unit),
                location = COALESCE($7, location),
                status = COALESCE($8, status),
                received_date = COALESCE($9, received_date),
                remarks = COALESCE($10, remarks),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            STOCK_COLUMNS
        ))
        .bind(id)
        .bind(&dto.part_no)
        .bind(&dto.serial_no)
        .bind(&dto.description)
        .bind(dto.quantity)
        .bind(&dto.unit)
        .bind(&dto.location)
        .bind(&dto.status)
        .bind(dto.received_date)
        .bind(&dto.remarks)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock record {} not found", id)))?;

        if dto.touches_part_identity() {
            let refreshed = refresh_inspections(&mut tx, &OrphanSnapshot::from(&item)).await?;
            tracing::debug!("Refreshed {} inspections of stock record {}", refreshed, id);
        }

        tx.commit().await?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_STOCK_INVENTORY, id))
            .await;

        Ok(item.into())
    }

    /// Delete one record, keeping its inspections as orphans
    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let item = self.find(id).await?;

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::StockInventory, &[id])
            .await?;

        let mut tx = self.pool.begin().await?;
        let orphaned = orphan_inspections(&mut tx, &OrphanSnapshot::from(&item)).await?;
        sqlx::query("DELETE FROM stock_inventory WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "Deleted stock record {} (P/N {}), orphaned {} inspections, {} file failures",
            id,
            item.part_no,
            orphaned,
            file_failures.len()
        );

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_STOCK_INVENTORY, id)
                    .details(format!("P/N {}", item.part_no)),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    /// Delete every listed record that exists, in one transaction
    pub async fn bulk_delete(
        &self,
        ids: &[Uuid],
        user: &AuthenticatedUser,
    ) -> Result<BulkDeleteResultDto> {
        if ids.len() as u64 > MAX_BULK_DELETE_IDS {
            return Err(AppError::Validation(format!(
                "At most {} ids can be deleted at once",
                MAX_BULK_DELETE_IDS
            )));
        }

        let items = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {} FROM stock_inventory WHERE id = ANY($1)",
            STOCK_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let existing: HashSet<Uuid> = items.iter().map(|i| i.id).collect();
        let (deleted_ids, not_found_ids) = partition_found(ids, &existing);

        if deleted_ids.is_empty() {
            return Ok(BulkDeleteResultDto {
                deleted_ids,
                not_found_ids,
                file_failures: Vec::new(),
            });
        }

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::StockInventory, &deleted_ids)
            .await?;

        let mut tx = self.pool.begin().await?;
        let mut orphaned = 0;
        for item in &items {
            orphaned += orphan_inspections(&mut tx, &OrphanSnapshot::from(item)).await?;
        }
        sqlx::query("DELETE FROM stock_inventory WHERE id = ANY($1)")
            .bind(&deleted_ids)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "Bulk deleted {} stock records ({} not found), orphaned {} inspections, {} file failures",
            deleted_ids.len(),
            not_found_ids.len(),
            orphaned,
            file_failures.len()
        );

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_BULK_DELETE)
                    .details(format!("{} stock records", deleted_ids.len())),
            )
            .await;

        Ok(BulkDeleteResultDto {
            deleted_ids,
            not_found_ids,
            file_failures,
        })
    }

    async fn find(&self, id: Uuid) -> Result<StockItem> {
        sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {} FROM stock_inventory WHERE id = $1",
            STOCK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock record {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{insert_test_user, InMemoryObjectStore};
    use chrono::NaiveDate;

    type InspectionIdentity = (Option<Uuid>, bool, String, Option<String>, Option<String>);

    fn service(pool: &PgPool, store: Arc<InMemoryObjectStore>) -> StockItemService {
        let limits = SearchLimits::new(50, 500);
        let activity = Arc::new(ActivityService::new(pool.clone(), limits));
        let attachments = Arc::new(AttachmentService::new(
            pool.clone(),
            store,
            Arc::clone(&activity),
        ));
        StockItemService::new(pool.clone(), limits, activity, attachments)
    }

    fn stock(part_no: &str, serial_no: &str, description: &str) -> CreateStockItemDto {
        CreateStockItemDto {
            part_no: part_no.to_string(),
            serial_no: Some(serial_no.to_string()),
            description: description.to_string(),
            quantity: 1,
            unit: "ea".to_string(),
            location: Some("Bin A3".to_string()),
            status: "serviceable".to_string(),
            received_date: None,
            remarks: None,
        }
    }

    async fn insert_inspection(pool: &PgPool, stock_id: Uuid, part_no: &str) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO incoming_inspections
                (stock_inventory_id, part_no, inspection_date, inspector)
            VALUES ($1, $2, $3, 'J. Wibowo')
            RETURNING id
            "#,
        )
        .bind(stock_id)
        .bind(part_no)
        .bind(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn insert_attachment(pool: &PgPool, stock_id: Uuid, file_key: &str) {
        sqlx::query(
            r#"
            INSERT INTO stock_inventory_attachments
                (owner_id, file_key, original_name, file_size, content_type, checksum)
            VALUES ($1, $2, 'cert.pdf', 4, 'application/pdf', $3)
            "#,
        )
        .bind(stock_id)
        .bind(file_key)
        .bind("0".repeat(64))
        .execute(pool)
        .await
        .unwrap();
    }

    async fn inspection_identity(pool: &PgPool, id: Uuid) -> InspectionIdentity {
        sqlx::query_as(
            r#"
            SELECT stock_inventory_id, stock_inventory_deleted, part_no, serial_no, description
            FROM incoming_inspections WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn stock_count(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM stock_inventory")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_orphans_inspections_with_copied_identity(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let store = Arc::new(InMemoryObjectStore::default());
        let service = service(&pool, Arc::clone(&store));

        let item = service.create(stock("PN-A", "SN1", "Pump"), &user).await.unwrap();
        let inspection = insert_inspection(&pool, item.id, "stale").await;
        let key = format!("stock-inventory/{}/cert.pdf", item.id);
        insert_attachment(&pool, item.id, &key).await;
        store.insert(&key, b"%PDF");

        let result = service.delete(item.id, &user).await.unwrap();

        assert_eq!(result.id, item.id);
        assert!(result.file_failures.is_empty());
        assert!(!store.contains(&key));
        assert_eq!(
            inspection_identity(&pool, inspection).await,
            (
                None,
                true,
                "PN-A".to_string(),
                Some("SN1".to_string()),
                Some("Pump".to_string())
            )
        );
        assert_eq!(stock_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_missing_record_is_not_found(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool, Arc::new(InMemoryObjectStore::default()));

        let result = service.delete(Uuid::new_v4(), &user).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_bulk_delete_reports_missing_ids_and_storage_failures(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let s1 = Uuid::new_v4();
        let failing_key = format!("stock-inventory/{}/cert.pdf", s1);
        let store = Arc::new(InMemoryObjectStore::failing_on(&[failing_key.as_str()]));
        let service = service(&pool, Arc::clone(&store));

        // Fixed id so the failing key is known up front
        sqlx::query(
            "INSERT INTO stock_inventory (id, part_no, serial_no, description) \
             VALUES ($1, 'PN-A', 'SN1', 'Pump')",
        )
        .bind(s1)
        .execute(&pool)
        .await
        .unwrap();
        let s2 = service.create(stock("PN-B", "SN2", "Valve"), &user).await.unwrap().id;
        let inspection = insert_inspection(&pool, s1, "PN-A").await;
        insert_attachment(&pool, s1, &failing_key).await;
        store.insert(&failing_key, b"%PDF");
        let missing = Uuid::new_v4();

        let result = service
            .bulk_delete(&[s1, missing, s2, s1], &user)
            .await
            .unwrap();

        assert_eq!(result.deleted_ids, vec![s1, s2]);
        assert_eq!(result.not_found_ids, vec![missing]);
        assert_eq!(result.file_failures.len(), 1);
        assert_eq!(result.file_failures[0].file_key, failing_key);
        assert_eq!(
            inspection_identity(&pool, inspection).await,
            (
                None,
                true,
                "PN-A".to_string(),
                Some("SN1".to_string()),
                Some("Pump".to_string())
            )
        );
        assert_eq!(stock_count(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_bulk_delete_with_only_missing_ids_changes_nothing(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool, Arc::new(InMemoryObjectStore::default()));
        service.create(stock("PN-A", "SN1", "Pump"), &user).await.unwrap();
        let missing = Uuid::new_v4();

        let result = service.bulk_delete(&[missing], &user).await.unwrap();

        assert!(result.deleted_ids.is_empty());
        assert_eq!(result.not_found_ids, vec![missing]);
        assert_eq!(stock_count(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_update_refreshes_linked_inspections(pool: PgPool) {
        let user = insert_test_user(&pool).await;
        let service = service(&pool, Arc::new(InMemoryObjectStore::default()));
        let item = service.create(stock("PN-C", "SN3", "Starter"), &user).await.unwrap();
        let inspection = insert_inspection(&pool, item.id, "PN-C").await;

        let updated = service
            .update(
                item.id,
                UpdateStockItemDto {
                    part_no: Some("PN-C2".to_string()),
                    ..Default::default()
                },
                &user,
            )
            .await
            .unwrap();

        assert_eq!(updated.part_no, "PN-C2");
        let (link, deleted, part_no, serial_no, description) =
            inspection_identity(&pool, inspection).await;
        assert_eq!(link, Some(item.id));
        assert!(!deleted);
        assert_eq!(part_no, "PN-C2");
        assert_eq!(serial_no.as_deref(), Some("SN3"));
        assert_eq!(description.as_deref(), Some("Starter"));
    }
}
