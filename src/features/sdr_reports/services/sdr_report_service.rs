use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::{AttachmentKind, AttachmentService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::sdr_reports::dtos::{
    CreateSdrReportDto, SdrReportQueryParams, SdrReportResponseDto, UpdateSdrReportDto,
};
use crate::features::sdr_reports::models::SdrReport;
use crate::shared::constants::{ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_SDR_REPORT};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::RecordDeletedDto;

const SDR_COLUMNS: &str = "id, report_number, aircraft_registration, occurrence_date, \
    ata_chapter, part_no, description, corrective_action, status, submitted_by, \
    created_at, updated_at";

const DUPLICATE_NUMBER: &str = "Report number already exists";

pub struct SdrReportService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    attachments: Arc<AttachmentService>,
}

impl SdrReportService {
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
        dto: CreateSdrReportDto,
        user: &AuthenticatedUser,
    ) -> Result<SdrReportResponseDto> {
        let report = sqlx::query_as::<_, SdrReport>(&format!(
            r#"
            INSERT INTO sdr_reports
                (report_number, aircraft_registration, occurrence_date, ata_chapter, part_no,
                 description, corrective_action, status, submitted_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            SDR_COLUMNS
        ))
        .bind(dto.report_number.trim())
        .bind(&dto.aircraft_registration)
        .bind(dto.occurrence_date)
        .bind(&dto.ata_chapter)
        .bind(&dto.part_no)
        .bind(&dto.description)
        .bind(&dto.corrective_action)
        .bind(&dto.status)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_NUMBER))?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_SDR_REPORT, report.id)
                    .details(report.report_number.clone()),
            )
            .await;

        Ok(report.into())
    }

    pub async fn search(&self, params: &SdrReportQueryParams) -> Result<Vec<SdrReportResponseDto>> {
        let filters = TextFilters::new()
            .with("report_number", params.report_number.as_deref())
            .with("aircraft_registration", params.aircraft_registration.as_deref())
            .with("part_no", params.part_no.as_deref())
            .with("status", params.status.as_deref());

        let mut qb = build_search_query(
            SDR_COLUMNS,
            "sdr_reports",
            &filters,
            "occurrence_date DESC, created_at DESC",
            self.limits,
        );

        let reports: Vec<SdrReport> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(reports.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<SdrReportResponseDto> {
        self.find(id).await.map(Into::into)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateSdrReportDto,
        user: &AuthenticatedUser,
    ) -> Result<SdrReportResponseDto> {
        let report = sqlx::query_as::<_, SdrReport>(&format!(
            r#"
            UPDATE sdr_reports
            SET report_number = COALESCE($2, report_number),
                aircraft_registration = COALESCE($3, aircraft_registration),
                occurrence_date = COALESCE($4, occurrence_date),
                ata_chapter = COALESCE($5, ata_chapter),
                part_no = COALESCE($6, part_no),
                description = COALESCE($7, description),
                corrective_action = COALESCE($8, corrective_action),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SDR_COLUMNS
        ))
        .bind(id)
        .bind(&dto.report_number)
        .bind(&dto.aircraft_registration)
        .bind(dto.occurrence_date)
        .bind(&dto.ata_chapter)
        .bind(&dto.part_no)
        .bind(&dto.description)
        .bind(&dto.corrective_action)
        .bind(&dto.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, DUPLICATE_NUMBER))?
        .ok_or_else(|| AppError::NotFound(format!("SDR report {} not found", id)))?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_SDR_REPORT, id))
            .await;

        Ok(report.into())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let report = self.find(id).await?;

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::SdrReports, &[id])
            .await?;

        sqlx::query("DELETE FROM sdr_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_SDR_REPORT, id)
                    .details(report.report_number),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    async fn find(&self, id: Uuid) -> Result<SdrReport> {
        sqlx::query_as::<_, SdrReport>(&format!(
            "SELECT {} FROM sdr_reports WHERE id = $1",
            SDR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("SDR report {} not found", id)))
    }
}
