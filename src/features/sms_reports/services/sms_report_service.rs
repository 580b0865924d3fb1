use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::{AttachmentKind, AttachmentService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::sms_reports::dtos::{
    CreateSmsReportDto, SmsReportQueryParams, SmsReportResponseDto, UpdateSmsReportDto,
};
use crate::features::sms_reports::models::SmsReport;
use crate::shared::constants::{ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_SMS_REPORT};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::RecordDeletedDto;

const SMS_COLUMNS: &str = "id, title, hazard_description, location, severity, likelihood, \
    status, occurred_at, reported_by, created_at, updated_at";

/// Service for safety hazard reports
pub struct SmsReportService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    attachments: Arc<AttachmentService>,
}

impl SmsReportService {
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
        dto: CreateSmsReportDto,
        user: &AuthenticatedUser,
    ) -> Result<SmsReportResponseDto> {
        let report = sqlx::query_as::<_, SmsReport>(&format!(
            r#"
            INSERT INTO sms_reports
                (title, hazard_description, location, severity, likelihood, status,
                 occurred_at, reported_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            SMS_COLUMNS
        ))
        .bind(dto.title.trim())
        .bind(&dto.hazard_description)
        .bind(&dto.location)
        .bind(&dto.severity)
        .bind(&dto.likelihood)
        .bind(&dto.status)
        .bind(dto.occurred_at)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        info!(
            "SMS report {} raised with severity {} by {}",
            report.id, report.severity, user.email
        );

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_SMS_REPORT, report.id)
                    .details(report.title.clone()),
            )
            .await;

        Ok(report.into())
    }

    pub async fn search(&self, params: &SmsReportQueryParams) -> Result<Vec<SmsReportResponseDto>> {
        let filters = TextFilters::new()
            .with("title", params.title.as_deref())
            .with("severity", params.severity.as_deref())
            .with("status", params.status.as_deref());

        let mut qb = build_search_query(
            SMS_COLUMNS,
            "sms_reports",
            &filters,
            "occurred_at DESC, created_at DESC",
            self.limits,
        );

        let reports: Vec<SmsReport> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(reports.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<SmsReportResponseDto> {
        self.find(id).await.map(Into::into)
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateSmsReportDto,
        user: &AuthenticatedUser,
    ) -> Result<SmsReportResponseDto> {
        let report = sqlx::query_as::<_, SmsReport>(&format!(
            r#"
            UPDATE sms_reports
            SET title = COALESCE($2, title),
                hazard_description = COALESCE($3, hazard_description),
                location = COALESCE($4, location),
                severity = COALESCE($5, severity),
                likelihood = COALESCE($6, likelihood),
                status = COALESCE($7, status),
                occurred_at = COALESCE($8, occurred_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SMS_COLUMNS
        ))
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.hazard_description)
        .bind(&dto.location)
        .bind(&dto.severity)
        .bind(&dto.likelihood)
        .bind(&dto.status)
        .bind(dto.occurred_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("SMS report {} not found", id)))?;

        let mut entry = ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_SMS_REPORT, id);
        if let Some(status) = &dto.status {
            entry = entry.details(format!("status: {}", status));
        }
        self.activity.record(entry).await;

        Ok(report.into())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let report = self.find(id).await?;

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::SmsReports, &[id])
            .await?;

        sqlx::query("DELETE FROM sms_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_SMS_REPORT, id)
                    .details(report.title),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    async fn find(&self, id: Uuid) -> Result<SmsReport> {
        sqlx::query_as::<_, SmsReport>(&format!(
            "SELECT {} FROM sms_reports WHERE id = $1",
            SMS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("SMS report {} not found", id)))
    }
}
