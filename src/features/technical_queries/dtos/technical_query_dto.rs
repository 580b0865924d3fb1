use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::technical_queries::models::{TechnicalQuery, TechnicalResponse};
use crate::shared::validation::ATA_CHAPTER_REGEX;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTechnicalQueryDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 10000, message = "Body is required"))]
    pub body: String,

    /// e.g. "ATR 72-600"
    #[validate(length(max = 100))]
    pub aircraft_type: Option<String>,

    #[validate(regex(path = *ATA_CHAPTER_REGEX, message = "Invalid ATA chapter"))]
    pub ata_chapter: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTechnicalQueryDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 10000))]
    pub body: Option<String>,

    #[validate(length(max = 100))]
    pub aircraft_type: Option<String>,

    #[validate(regex(path = *ATA_CHAPTER_REGEX, message = "Invalid ATA chapter"))]
    pub ata_chapter: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TechnicalQueryParams {
    pub title: Option<String>,
    pub aircraft_type: Option<String>,
    pub ata_chapter: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTechnicalResponseDto {
    #[validate(length(min = 1, max = 10000, message = "Body is required"))]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TechnicalQueryResponseDto {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub aircraft_type: Option<String>,
    pub ata_chapter: Option<String>,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub response_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TechnicalQuery> for TechnicalQueryResponseDto {
    fn from(q: TechnicalQuery) -> Self {
        Self {
            id: q.id,
            title: q.title,
            body: q.body,
            aircraft_type: q.aircraft_type,
            ata_chapter: q.ata_chapter,
            author_id: q.author_id,
            author_name: q.author_name,
            upvotes: q.upvotes,
            downvotes: q.downvotes,
            response_count: q.response_count,
            created_at: q.created_at,
            updated_at: q.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TechnicalResponseDto {
    pub id: Uuid,
    pub query_id: Uuid,
    pub body: String,
    pub author_id: Uuid,
    pub author_name: Option<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TechnicalResponse> for TechnicalResponseDto {
    fn from(r: TechnicalResponse) -> Self {
        Self {
            id: r.id,
            query_id: r.query_id,
            body: r.body,
            author_id: r.author_id,
            author_name: r.author_name,
            upvotes: r.upvotes,
            downvotes: r.downvotes,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// A query together with its responses, best voted first
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TechnicalQueryDetailDto {
    pub query: TechnicalQueryResponseDto,
    pub responses: Vec<TechnicalResponseDto>,
}
