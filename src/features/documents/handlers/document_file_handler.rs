use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{DocumentFileResponseDto, UploadDocumentDto};
use crate::features::documents::routes::DocumentsState;
use crate::shared::download::FileDownload;
use crate::shared::types::{ApiResponse, RecordDeletedDto};
use crate::shared::upload::read_upload;

/// Upload a file to the document library
#[utoipa::path(
    post,
    path = "/api/documents/files",
    request_body(content = UploadDocumentDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored", body = ApiResponse<DocumentFileResponseDto>),
        (status = 400, description = "Missing file, disallowed type or too large"),
        (status = 404, description = "Folder not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn upload_document(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<DocumentFileResponseDto>>)> {
    let file = read_upload(multipart).await?;
    let document = state.files.upload(file, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(document), None, None)),
    ))
}

/// Get document file metadata
#[utoipa::path(
    get,
    path = "/api/documents/files/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document metadata", body = ApiResponse<DocumentFileResponseDto>),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn get_document(
    _user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DocumentFileResponseDto>>> {
    let document = state.files.get(id).await?;
    Ok(Json(ApiResponse::success(Some(document), None, None)))
}

/// Download a document file
#[utoipa::path(
    get,
    path = "/api/documents/files/{id}/download",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Document or stored object not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn download_document(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    Path(id): Path<Uuid>,
) -> Result<FileDownload> {
    state.files.download(id, &user).await
}

/// Delete a document file and its stored object
#[utoipa::path(
    delete,
    path = "/api/documents/files/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "Document not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn delete_document(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = state.files.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Document deleted".to_string()),
        None,
    )))
}
