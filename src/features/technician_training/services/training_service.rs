use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::attachments::{AttachmentKind, AttachmentService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::technician_training::dtos::{
    CreateTrainingDto, TrainingQueryParams, TrainingResponseDto, UpdateTrainingDto,
};
use crate::features::technician_training::models::TechnicianTraining;
use crate::shared::constants::{
    ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ENTITY_TECHNICIAN_TRAINING,
};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::RecordDeletedDto;

const TRAINING_COLUMNS: &str = "id, technician_name, course_name, provider, completion_date, \
    expiry_date, certificate_no, remarks, created_by, created_at, updated_at";

pub struct TrainingService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    attachments: Arc<AttachmentService>,
}

impl TrainingService {
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
        dto: CreateTrainingDto,
        user: &AuthenticatedUser,
    ) -> Result<TrainingResponseDto> {
        let training = sqlx::query_as::<_, TechnicianTraining>(&format!(
            r#"
            INSERT INTO technician_trainings
                (technician_name, course_name, provider, completion_date, expiry_date,
                 certificate_no, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            TRAINING_COLUMNS
        ))
        .bind(dto.technician_name.trim())
        .bind(dto.course_name.trim())
        .bind(&dto.provider)
        .bind(dto.completion_date)
        .bind(dto.expiry_date)
        .bind(&dto.certificate_no)
        .bind(&dto.remarks)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_TECHNICIAN_TRAINING, training.id)
                    .details(format!("{}: {}", training.technician_name, training.course_name)),
            )
            .await;

        Ok(training.into())
    }

    pub async fn search(&self, params: &TrainingQueryParams) -> Result<Vec<TrainingResponseDto>> {
        let filters = TextFilters::new()
            .with("technician_name", params.technician_name.as_deref())
            .with("course_name", params.course_name.as_deref())
            .with("certificate_no", params.certificate_no.as_deref());

        let mut qb = build_search_query(
            TRAINING_COLUMNS,
            "technician_trainings",
            &filters,
            "completion_date DESC, created_at DESC",
            self.limits,
        );

        let trainings: Vec<TechnicianTraining> =
            qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(trainings.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<TrainingResponseDto> {
        self.find(id).await.map(Into::into)
    }

    /// Partial update. The merged dates must still be ordered.
    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateTrainingDto,
        user: &AuthenticatedUser,
    ) -> Result<TrainingResponseDto> {
        let training = sqlx::query_as::<_, TechnicianTraining>(&format!(
            r#"
            UPDATE technician_trainings
            SET technician_name = COALESCE($2, technician_name),
                course_name = COALESCE($3, course_name),
                provider = COALESCE($4, provider),
                completion_date = COALESCE($5, completion_date),
                expiry_date = COALESCE($6, expiry_date),
                certificate_no = COALESCE($7, certificate_no),
                remarks = COALESCE($8, remarks),
                updated_at = NOW()
            WHERE id = $1
              AND (COALESCE($6, expiry_date) IS NULL
                   OR COALESCE($6, expiry_date) >= COALESCE($5, completion_date))
            RETURNING {}
            "#,
            TRAINING_COLUMNS
        ))
        .bind(id)
        .bind(&dto.technician_name)
        .bind(&dto.course_name)
        .bind(&dto.provider)
        .bind(dto.completion_date)
        .bind(dto.expiry_date)
        .bind(&dto.certificate_no)
        .bind(&dto.remarks)
        .fetch_optional(&self.pool)
        .await?;

        let training = match training {
            Some(t) => t,
            None => {
                // Either the row is missing or the merged dates were rejected
                self.find(id).await?;
                return Err(AppError::Validation(
                    "Expiry date cannot be before completion date".to_string(),
                ));
            }
        };

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_TECHNICIAN_TRAINING, id),
            )
            .await;

        Ok(training.into())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let training = self.find(id).await?;

        let file_failures = self
            .attachments
            .purge_for_owners(AttachmentKind::TechnicianTrainings, &[id])
            .await?;

        sqlx::query("DELETE FROM technician_trainings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_TECHNICIAN_TRAINING, id)
                    .details(format!("{}: {}", training.technician_name, training.course_name)),
            )
            .await;

        Ok(RecordDeletedDto { id, file_failures })
    }

    async fn find(&self, id: Uuid) -> Result<TechnicianTraining> {
        sqlx::query_as::<_, TechnicianTraining>(&format!(
            "SELECT {} FROM technician_trainings WHERE id = $1",
            TRAINING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Training record {} not found", id)))
    }
}
