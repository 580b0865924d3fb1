use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DocumentFile {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub file_key: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub checksum: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
