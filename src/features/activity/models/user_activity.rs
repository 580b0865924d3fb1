use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Activity row joined with the acting user's email
#[derive(Debug, Clone, FromRow)]
pub struct UserActivity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
