use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A completed course on a technician's training record
#[derive(Debug, Clone, FromRow)]
pub struct TechnicianTraining {
    pub id: Uuid,
    pub technician_name: String,
    pub course_name: String,
    pub provider: Option<String>,
    pub completion_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub certificate_no: Option<String>,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
