use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::attachments::models::Attachment;
use crate::features::attachments::AttachmentKind;

/// Multipart form for attachment uploads
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadAttachmentDto {
    /// The file to attach
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponseDto {
    pub id: Uuid,
    pub kind: AttachmentKind,
    pub owner_id: Uuid,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    /// SHA-256 of the content, hex encoded
    pub checksum: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl AttachmentResponseDto {
    pub fn from_model(kind: AttachmentKind, attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            kind,
            owner_id: attachment.owner_id,
            original_name: attachment.original_name,
            file_size: attachment.file_size,
            content_type: attachment.content_type,
            checksum: attachment.checksum,
            uploaded_by: attachment.uploaded_by,
            created_at: attachment.created_at,
        }
    }
}
