use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::storage::FileFailure;

/// Response envelope shared by every JSON endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    /// Success envelope for list endpoints, with the row count in `meta`
    pub fn list(items: Vec<T>) -> ApiResponse<Vec<T>> {
        let total = items.len() as i64;
        ApiResponse::success(Some(items), None, Some(Meta { total }))
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

/// Body returned by delete endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedDto {
    pub deleted: bool,
}

/// Body returned when a record with stored files is deleted
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordDeletedDto {
    pub id: Uuid,
    /// Stored objects that could not be removed; the record is gone regardless
    pub file_failures: Vec<FileFailure>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteRequestDto {
    #[validate(length(min = 1, message = "At least one id is required"))]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResultDto {
    pub deleted_ids: Vec<Uuid>,
    pub not_found_ids: Vec<Uuid>,
    pub file_failures: Vec<FileFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope_counts_items() {
        let response = ApiResponse::list(vec!["a", "b", "c"]);
        assert!(response.success);
        assert_eq!(response.meta.map(|m| m.total), Some(3));
        assert_eq!(response.data.map(|d| d.len()), Some(3));
    }

    #[test]
    fn test_error_envelope_serializes_flag() {
        let body = serde_json::to_value(ApiResponse::<()>::error(
            Some("Invalid PIN".to_string()),
            None,
        ))
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid PIN");
        assert!(body["data"].is_null());
    }
}
