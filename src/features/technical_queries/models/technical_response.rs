use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TechnicalResponse {
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
