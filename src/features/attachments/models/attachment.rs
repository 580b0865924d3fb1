use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Row of any `*_attachments` table
#[derive(Debug, Clone, FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_key: String,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub checksum: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
