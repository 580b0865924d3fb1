use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SmsReport {
    pub id: Uuid,
    pub title: String,
    pub hazard_description: String,
    pub location: Option<String>,
    pub severity: String,
    pub likelihood: String,
    pub status: String,
    pub occurred_at: NaiveDate,
    pub reported_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
