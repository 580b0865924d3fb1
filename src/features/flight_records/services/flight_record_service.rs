use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::{AttachmentKind, AttachmentService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::flight_records::dtos::{
    CreateFlightRecordDto, FlightRecordQueryParams, FlightRecordResponseDto,
    UpdateFlightRecordDto,
};
use crate::features::flight_records::models::FlightRecord;
use crate::shared::constants::{ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_FLIGHT_RECORD};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::RecordDeletedDto;

const FLIGHT_RECORD_COLUMNS: &str = "id, flight_date, aircraft_registration, flight_number, \
    pilot_name, origin, destination, block_hours, cycles, remarks, created_by, created_at, updated_at";

/// Service for aircraft flight log entries
pub struct FlightRecordService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    attachments: Arc<AttachmentService>,
}

impl FlightRecordService {
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
        dto: CreateFlightRecordDto,
        user: &AuthenticatedUser,
    ) -> Result<FlightRecordResponseDto> {
        let record = sqlx::query_as::<_, FlightRecord>(&format!(
            r#"
            INSERT INTO flight_records
                (flight_date, aircraft_registration, flight_number, pilot_name, origin,
                 destination, block_hours, cycles, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            FLIGHT_RECORD_COLUMNS
        ))
        .bind(dto.flight_date)
        .bind(&dto.aircraft_registration)
        .bind(&dto.flight_number)
        .bind(&dto.pilot_name)
        .bind(&dto.origin)
        .bind(&dto.destination)
        .bind(dto.block_hours)
        .bind(dto.cycles)
        .bind(&dto.remarks)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create flight record: {:?}", e);
            AppError::from_db(e, "Flight record already exists")
        })?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_FLIGHT_RECORD, record.id)
                    .details(format!("{} {}", record.aircraft_registration, record.flight_number)),
            )
            .await;

        Ok(record.into())
    }

    /// Most recent records, narrowed by the given filters
    pub async fn search(
        &self,
        params: &FlightRecordQueryParams,
    ) -> Result<Vec<FlightRecordResponseDto>> {
        let filters = TextFilters::new()
            .with("aircraft_registration", params.aircraft_registration.as_deref())
            .with("flight_number", params.flight_number.as_deref())
            .with("pilot_name", params.pilot_name.as_deref())
            .with("origin", params.origin.as_deref())
            .with("destination", params.destination.as_deref());

        let mut qb = build_search_query(
            FLIGHT_RECORD_COLUMNS,
            "flight_records",
            &filters,
            "flight_date DESC, created_at DESC",
            self.limits,
        );

        let records: Vec<FlightRecord> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to search flight records: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<FlightRecordResponseDto> {
        self.find(id).await.map(Into::into)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateFlightRecordDto,
        user: &AuthenticatedUser,
    ) -> Result<FlightRecordResponseDto> {
        let record = sqlx::query_as::<_, FlightRecord>(&format!(
            r#"
            UPDATE flight_records
            SET flight_date = COALESCE($2, flight_date),
                aircraft_registration = COALESCE($3, aircraft_registration),
                flight_number = COALESCE($4, flight_number),
                pilot_name = COALESCE($5, pilot_name),
                origin = COALESCE($6, origin),
                destination = COALESCE($7, destination),
                block_hours = COALESCE($8, block_hours),
                cycles = COALESCE($9, cycles),
                remarks = COALESCE($10, remarks),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FLIGHT_RECORD_COLUMNS
        ))
        .bind(id)
        .bind(dto.flight_date)
        .bind(&dto.aircraft_registration)
        .bind(&dto.flight_number)
        .bind(&dto.pilot_name)
        .bind(&dto.origin)
        .bind(&dto.destination)
        .bind(dto.block_hours)
        .bind(dto.cycles)
        .bind(&dto.remarks)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight record {} not found", id)))?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_FLIGHT_RECORD, id))
            .await;

        Ok(record.into())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let record = self.find(id).await?;

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::FlightRecords, &[id])
            .await?;

        sqlx::query("DELETE FROM flight_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(
            "Deleted flight record {} ({} {})",
            id,
            record.aircraft_registration,
            record.flight_number
        );

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_DELETE).entity(ENTITY_FLIGHT_RECORD, id))
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    async fn find(&self, id: Uuid) -> Result<FlightRecord> {
        sqlx::query_as::<_, FlightRecord>(&format!(
            "SELECT {} FROM flight_records WHERE id = $1",
            FLIGHT_RECORD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Flight record {} not found", id)))
    }
}
