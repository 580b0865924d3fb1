use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use super::votes::{apply_vote, ensure_author, VoteTarget};
use super::TechnicalResponseService;
use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::technical_queries::dtos::{
    CreateTechnicalQueryDto, TechnicalQueryDetailDto, TechnicalQueryParams,
    TechnicalQueryResponseDto, UpdateTechnicalQueryDto, VoteCountsDto, VoteDirection,
};
use crate::features::technical_queries::models::TechnicalQuery;
use crate::shared::constants::{
    ACTION_CREATE, ACTION_DELETE, ACTION_UPDATE, ACTION_VOTE, ENTITY_TECHNICAL_QUERY,
};
use crate::shared::search::{build_search_query, SearchLimits, TextFilters};
use crate::shared::types::RecordDeletedDto;

const QUERY_COLUMNS: &str = "q.id, q.title, q.body, q.aircraft_type, q.ata_chapter, \
    q.author_id, u.name AS author_name, q.upvotes, q.downvotes, \
    (SELECT COUNT(*) FROM technical_responses r WHERE r.query_id = q.id) AS response_count, \
    q.created_at, q.updated_at";

const QUERY_FROM: &str = "technical_queries q LEFT JOIN users u ON u.id = q.author_id";

pub struct TechnicalQueryService {
    pool: PgPool,
    limits: SearchLimits,
    activity: Arc<ActivityService>,
    responses: Arc<TechnicalResponseService>,
}

impl TechnicalQueryService {
    pub fn new(
        pool: PgPool,
        limits: SearchLimits,
        activity: Arc<ActivityService>,
        responses: Arc<TechnicalResponseService>,
    ) -> Self {
        Self {
            pool,
            limits,
            activity,
            responses,
        }
    }

    pub async fn create(
        &self,
        dto: CreateTechnicalQueryDto,
        user: &AuthenticatedUser,
    ) -> Result<TechnicalQueryResponseDto> {
        let query = sqlx::query_as::<_, TechnicalQuery>(&format!(
            r#"
            WITH q AS (
                INSERT INTO technical_queries (title, body, aircraft_type, ata_chapter, author_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            SELECT {} FROM q LEFT JOIN users u ON u.id = q.author_id
            "#,
            QUERY_COLUMNS
        ))
        .bind(dto.title.trim())
        .bind(&dto.body)
        .bind(&dto.aircraft_type)
        .bind(&dto.ata_chapter)
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_CREATE)
                    .entity(ENTITY_TECHNICAL_QUERY, query.id)
                    .details(query.title.clone()),
            )
            .await;

        Ok(query.into())
    }

    pub async fn search(
        &self,
        params: &TechnicalQueryParams,
    ) -> Result<Vec<TechnicalQueryResponseDto>> {
        let filters = TextFilters::new()
            .with("q.title", params.title.as_deref())
            .with("q.aircraft_type", params.aircraft_type.as_deref())
            .with("q.ata_chapter", params.ata_chapter.as_deref());

        let mut qb = build_search_query(
            QUERY_COLUMNS,
            QUERY_FROM,
            &filters,
            "q.created_at DESC",
            self.limits,
        );

        let queries: Vec<TechnicalQuery> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(queries.into_iter().map(Into::into).collect())
    }

    pub async fn get_with_responses(&self, id: Uuid) -> Result<TechnicalQueryDetailDto> {
        let query = self.find(id).await?;
        let responses = self.responses.list_for_query(id).await?;

        Ok(TechnicalQueryDetailDto {
            query: query.into(),
            responses,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateTechnicalQueryDto,
        user: &AuthenticatedUser,
    ) -> Result<TechnicalQueryResponseDto> {
        let existing = self.find(id).await?;
        ensure_author(existing.author_id, user, "query")?;

        let query = sqlx::query_as::<_, TechnicalQuery>(&format!(
            r#"
            WITH q AS (
                UPDATE technical_queries
                SET title = COALESCE($2, title),
                    body = COALESCE($3, body),
                    aircraft_type = COALESCE($4, aircraft_type),
                    ata_chapter = COALESCE($5, ata_chapter),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {} FROM q LEFT JOIN users u ON u.id = q.author_id
            "#,
            QUERY_COLUMNS
        ))
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.body)
        .bind(&dto.aircraft_type)
        .bind(&dto.ata_chapter)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Technical query {} not found", id)))?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_UPDATE).entity(ENTITY_TECHNICAL_QUERY, id))
            .await;

        Ok(query.into())
    }

    /// Delete a query; its responses go with it
    pub async fn delete(&self, id: Uuid, user: &AuthenticatedUser) -> Result<RecordDeletedDto> {
        let existing = self.find(id).await?;
        ensure_author(existing.author_id, user, "query")?;

        sqlx::query("DELETE FROM technical_queries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_DELETE)
                    .entity(ENTITY_TECHNICAL_QUERY, id)
                    .details(existing.title),
            )
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
        let counts = apply_vote(&self.pool, VoteTarget::Query, id, direction).await?;

        self.activity
            .record(
                ActivityEntry::new(user.id, ACTION_VOTE)
                    .entity(ENTITY_TECHNICAL_QUERY, id)
                    .details(direction.as_str()),
            )
            .await;

        Ok(counts)
    }

    async fn find(&self, id: Uuid) -> Result<TechnicalQuery> {
        sqlx::query_as::<_, TechnicalQuery>(&format!(
            "SELECT {} FROM {} WHERE q.id = $1",
            QUERY_COLUMNS, QUERY_FROM
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Technical query {} not found", id)))
    }
}
