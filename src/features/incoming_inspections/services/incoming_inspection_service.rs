use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::{AttachmentKind, AttachmentService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::incoming_inspections::dtos::{
    CreateIncomingInspectionDto, IncomingInspectionQueryParams, IncomingInspectionResponseDto,
    UpdateIncomingInspectionDto,
};
use crate::features::incoming_inspections::models::{IncomingInspection, PartIdentity};
use crate::features::stock_inventory::models::OrphanSnapshot;
use crate::shared::constants::{
    ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_INCOMING_INSPECTION,
};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::RecordDeletedDto;

const INSPECTION_COLUMNS: &str = "id, stock_inventory_id, stock_inventory_deleted, part_no, \
    serial_no, description, inspection_date, inspector, result, remarks, created_by, \
    created_at, updated_at";

/// Service for incoming (receiving) inspections
pub struct IncomingInspectionService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    attachments: Arc<AttachmentService>,
}

impl IncomingInspectionService {
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
        dto: CreateIncomingInspectionDto,
        user: &AuthenticatedUser,
    ) -> Result<IncomingInspectionResponseDto> {
        let stock = match dto.stock_inventory_id {
            Some(stock_id) => Some(self.stock_snapshot(stock_id).await?),
            None => None,
        };
        let identity = PartIdentity::resolve(
            stock.as_ref(),
            dto.part_no.as_deref(),
            dto.serial_no.as_deref(),
            dto.description.as_deref(),
        )?;

        let inspection = sqlx::query_as::<_, IncomingInspection>(&format!(
            r#"
            INSERT INTO incoming_inspections
                (stock_inventory_id, part_no, serial_no, description, inspection_date,
                 inspector, result, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            INSPECTION_COLUMNS
        ))
        .bind(dto.stock_inventory_id)
        .bind(&identity.part_no)
        .bind(&identity.serial_no)
        .bind(&identity.description)
        .bind(dto.inspection_date)
        .bind(dto.inspector.trim())
        .bind(&dto.result)
        .bind(&dto.remarks)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Inspection already exists"))?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_INCOMING_INSPECTION, inspection.id)
                    .details(format!("P/N {}", inspection.part_no)),
            )
            .await;

        Ok(inspection.into())
    }

    pub async fn search(
        &self,
        params: &IncomingInspectionQueryParams,
    ) -> Result<Vec<IncomingInspectionResponseDto>> {
        let filters = TextFilters::new()
            .with("part_no", params.part_no.as_deref())
            .with("serial_no", params.serial_no.as_deref())
            .with("inspector", params.inspector.as_deref())
            .with("result", params.result.as_deref());

        let mut qb = build_search_query(
            INSPECTION_COLUMNS,
            "incoming_inspections",
            &filters,
            "inspection_date DESC, created_at DESC",
            self.limits,
        );

        let rows: Vec<IncomingInspection> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<IncomingInspectionResponseDto> {
        self.find(id).await.map(Into::into)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateIncomingInspectionDto,
        user: &AuthenticatedUser,
    ) -> Result<IncomingInspectionResponseDto> {
        // Linked inspections take their part identity from the stock record.
        let inspection = sqlx::query_as::<_, IncomingInspection>(&format!(
            r#"
            UPDATE incoming_inspections
            SET inspection_date = COALESCE($2, inspection_date),
                inspector = COALESCE($3, inspector),
                result = COALESCE($4, result),
                remarks = COALESCE($5, remarks),
                part_no = CASE WHEN stock_inventory_id IS NULL
                               THEN COALESCE($6, part_no) ELSE part_no END,
                serial_no = CASE WHEN stock_inventory_id IS NULL
                                 THEN COALESCE($7, serial_no) ELSE serial_no END,
                description = CASE WHEN stock_inventory_id IS NULL
                                   THEN COALESCE($8, description) ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            INSPECTION_COLUMNS
        ))
        .bind(id)
        .bind(dto.inspection_date)
        .bind(&dto.inspector)
        .bind(&dto.result)
        .bind(&dto.remarks)
        .bind(&dto.part_no)
        .bind(&dto.serial_no)
        .bind(&dto.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inspection {} not found", id)))?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_INCOMING_INSPECTION, id),
            )
            .await;

        Ok(inspection.into())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        self.find(id).await?;

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::IncomingInspections, &[id])
            .await?;

        sqlx::query("DELETE FROM incoming_inspections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE).entity(ENTITY_INCOMING_INSPECTION, id),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    async fn stock_snapshot(&self, stock_id: Uuid) -> Result<OrphanSnapshot> {
        let row = sqlx::query_as::<_, (Uuid, String, Option<String>, String)>(
            "SELECT id, part_no, serial_no, description FROM stock_inventory WHERE id = $1",
        )
        .bind(stock_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stock record {} not found", stock_id)))?;

        Ok(OrphanSnapshot {
            stock_inventory_id: row.0,
            part_no: row.1,
            serial_no: row.2,
            description: row.3,
        })
    }

    async fn find(&self, id: Uuid) -> Result<IncomingInspection> {
        sqlx::query_as::<_, IncomingInspection>(&format!(
            "SELECT {} FROM incoming_inspections WHERE id = $1",
            INSPECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inspection {} not found", id)))
    }
}
