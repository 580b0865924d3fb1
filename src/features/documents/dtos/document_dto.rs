use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::documents::models::{DocumentFile, DocumentFolder};

/// Distinguishes an absent field from an explicit `null`
fn explicit_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFolderDto {
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,

    /// Parent folder; omit for a top-level folder
    pub parent_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateFolderDto {
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New parent. `null` moves the folder to the top level, omitted leaves it in place.
    #[serde(default, deserialize_with = "explicit_option")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct FolderContentsQuery {
    /// Folder to list; omit for the top level
    pub folder_id: Option<Uuid>,
}

/// Multipart form for document uploads
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadDocumentDto {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,

    /// Target folder; omit to upload at the top level
    pub folder_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FolderResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentFolder> for FolderResponseDto {
    fn from(f: DocumentFolder) -> Self {
        Self {
            id: f.id,
            parent_id: f.parent_id,
            name: f.name,
            created_by: f.created_by,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentFileResponseDto {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub original_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub checksum: String,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<DocumentFile> for DocumentFileResponseDto {
    fn from(f: DocumentFile) -> Self {
        Self {
            id: f.id,
            folder_id: f.folder_id,
            original_name: f.original_name,
            file_size: f.file_size,
            content_type: f.content_type,
            checksum: f.checksum,
            uploaded_by: f.uploaded_by,
            created_at: f.created_at,
        }
    }
}

/// Direct children of one folder (or of the top level)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FolderContentsDto {
    /// `None` at the top level
    pub folder: Option<FolderResponseDto>,
    pub folders: Vec<FolderResponseDto>,
    pub files: Vec<DocumentFileResponseDto>,
}

/// Folder hierarchy node
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct FolderTreeDto {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub children: Vec<FolderTreeDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_parent_absent_vs_null() {
        let absent: UpdateFolderDto = serde_json::from_str(r#"{"name": "Manuals"}"#).unwrap();
        assert_eq!(absent.parent_id, None);

        let to_root: UpdateFolderDto = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(to_root.parent_id, Some(None));

        let id = Uuid::new_v4();
        let moved: UpdateFolderDto =
            serde_json::from_value(serde_json::json!({ "parent_id": id })).unwrap();
        assert_eq!(moved.parent_id, Some(Some(id)));
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let dto = CreateFolderDto {
            name: String::new(),
            parent_id: None,
        };
        assert!(dto.validate().is_err());
    }
}
