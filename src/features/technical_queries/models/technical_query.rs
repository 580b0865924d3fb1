use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TechnicalQuery {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub aircraft_type: Option<String>,
    pub ata_chapter: Option<String>,
    pub author_id: Uuid,
    /// Joined from users
    pub author_name: Option<String>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub response_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
