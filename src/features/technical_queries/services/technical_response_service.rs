use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::votes::{apply_vote, ensure_author, VoteTarget};
use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::technical_queries::dtos::{
    CreateTechnicalResponseDto, TechnicalResponseDto, VoteCountsDto, VoteDirection,
};
use crate::features::technical_queries::models::TechnicalResponse;
use crate::shared::constants::{ACTION_CREATE, ACTION_DELETE, ACTION_VOTE, ENTITY_TECHNICAL_RESPONSE};
use crate::shared::types::RecordDeletedDto;

const RESPONSE_COLUMNS: &str = "r.id, r.query_id, r.body, r.author_id, u.name AS author_name, \
    r.upvotes, r.downvotes, r.created_at, r.updated_at";

/// Service for answers posted under a technical query
pub struct TechnicalResponseService {
    pool: PgPool,
    activity: Arc<ActivityService>,
}

impl TechnicalResponseService {
    pub fn new(pool: PgPool, activity: Arc<ActivityService>) -> Self {
        Self { pool, activity }
    }

    pub async fn create(
        &self,
        query_id: Uuid,
        dto: CreateTechnicalResponseDto,
        user: &AuthenticatedUser,
    ) -> Result<TechnicalResponseDto> {
        let query_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM technical_queries WHERE id = $1)",
        )
        .bind(query_id)
        .fetch_one(&self.pool)
        .await?;

        if !query_exists {
            return Err(AppError::NotFound(format!(
                "Technical query {} not found",
                query_id
            )));
        }

        let response = sqlx::query_as::<_, TechnicalResponse>(&format!(
            r#"
            WITH r AS (
                INSERT INTO technical_responses (query_id, body, author_id)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT {} FROM r LEFT JOIN users u ON u.id = r.author_id
            "#,
            RESPONSE_COLUMNS
        ))
        .bind(query_id)
        .bind(&dto.body)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_TECHNICAL_RESPONSE, response.id)
                    .details(format!("query {}", query_id)),
            )
            .await;

        Ok(response.into())
    }

    /// Responses of a query, best net score first
    pub async fn list_for_query(&self, query_id: Uuid) -> Result<Vec<TechnicalResponseDto>> {
        let responses = sqlx::query_as::<_, TechnicalResponse>(&format!(
            r#"
            SELECT {}
            FROM technical_responses r
            LEFT JOIN users u ON u.id = r.author_id
            WHERE r.query_id = $1
            ORDER BY (r.upvotes - r.downvotes) DESC, r.created_at ASC
            "#,
            RESPONSE_COLUMNS
        ))
        .bind(query_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(responses.into_iter().map(Into::into).collect())
    }

    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let author_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT author_id FROM technical_responses WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Technical response {} not found", id)))?;

        ensure_author(author_id, user, "response")?;

        sqlx::query("DELETE FROM technical_responses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_DELETE).entity(ENTITY_TECHNICAL_RESPONSE, id))
            .await;

        Ok(RecordDeletedDto {
            id,
            file_failures: Vec::new(),
        })
    }

    pub async fn vote(
        &self,
        id: Uuid,
        direction: VoteDirection,
        user: &AuthenticatedUser,
    ) -> Result<VoteCountsDto> {
        let counts = apply_vote(&self.pool, VoteTarget::Response, id, direction).await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_VOTE)
                    .entity(ENTITY_TECHNICAL_RESPONSE, id)
                    .details(direction.as_str()),
            )
            .await;

        Ok(counts)
    }
}
