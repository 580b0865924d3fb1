use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of `airport_ids`
#[derive(Debug, Clone, FromRow)]
pub struct Airport {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
