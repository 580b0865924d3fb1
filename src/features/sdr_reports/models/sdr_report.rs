use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct SdrReport {
    pub id: Uuid,
    pub report_number: String,
    pub aircraft_registration: String,
    pub occurrence_date: NaiveDate,
    pub ata_chapter: Option<String>,
    pub part_no: Option<String>,
    pub description: String,
    pub corrective_action: Option<String>,
    pub status: String,
    pub submitted_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
