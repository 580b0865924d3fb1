use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_verified: bool,
    pub verification_pin: Option<String>,
    pub pin_created_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
