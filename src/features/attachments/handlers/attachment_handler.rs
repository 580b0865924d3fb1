use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::attachments::dtos::{AttachmentResponseDto, UploadAttachmentDto};
use crate::features::attachments::services::AttachmentService;
use crate::features::attachments::AttachmentKind;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::download::FileDownload;
use crate::shared::types::{ApiResponse, DeletedDto};
use crate::shared::upload::read_upload;

/// Attach a file to a record
#[utoipa::path(
    post,
    path = "/api/attachments/{kind}/{owner_id}",
    tag = "attachments",
    params(
        ("kind" = AttachmentKind, Path, description = "Record family"),
        ("owner_id" = Uuid, Path, description = "Owning record ID")
    ),
    request_body(content = UploadAttachmentDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Attachment stored", body = ApiResponse<AttachmentResponseDto>),
        (status = 400, description = "Missing file, disallowed type or too large"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Owning record not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_attachment(
    user: AuthenticatedUser,
    State(service): State<Arc<AttachmentService>>,
    Path((kind, owner_id)): Path<(AttachmentKind, Uuid)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<AttachmentResponseDto>>)> {
    let file = read_upload(multipart).await?;
    let attachment = service.upload(kind, owner_id, file, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(attachment), None, None)),
    ))
}

/// List the attachments of a record
#[utoipa::path(
    get,
    path = "/api/attachments/{kind}/{owner_id}",
    tag = "attachments",
    params(
        ("kind" = AttachmentKind, Path, description = "Record family"),
        ("owner_id" = Uuid, Path, description = "Owning record ID")
    ),
    responses(
        (status = 200, description = "Attachments of the record", body = ApiResponse<Vec<AttachmentResponseDto>>),
        (status = 404, description = "Owning record not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_attachments(
    _user: AuthenticatedUser,
    State(service): State<Arc<AttachmentService>>,
    Path((kind, owner_id)): Path<(AttachmentKind, Uuid)>,
) -> Result<Json<ApiResponse<Vec<AttachmentResponseDto>>>> {
    let attachments = service.list(kind, owner_id).await?;
    Ok(Json(ApiResponse::list(attachments)))
}

/// Download an attachment
#[utoipa::path(
    get,
    path = "/api/attachments/{kind}/{owner_id}/{attachment_id}",
    tag = "attachments",
    params(
        ("kind" = AttachmentKind, Path, description = "Record family"),
        ("owner_id" = Uuid, Path, description = "Owning record ID"),
        ("attachment_id" = Uuid, Path, description = "Attachment ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Attachment or stored object not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_attachment(
    user: AuthenticatedUser,
    State(service): State<Arc<AttachmentService>>,
    Path((kind, owner_id, attachment_id)): Path<(AttachmentKind, Uuid, Uuid)>,
) -> Result<FileDownload> {
    service.download(kind, owner_id, attachment_id, &user).await
}

/// Delete an attachment
#[utoipa::path(
    delete,
    path = "/api/attachments/{kind}/{owner_id}/{attachment_id}",
    tag = "attachments",
    params(
        ("kind" = AttachmentKind, Path, description = "Record family"),
        ("owner_id" = Uuid, Path, description = "Owning record ID"),
        ("attachment_id" = Uuid, Path, description = "Attachment ID")
    ),
    responses(
        (status = 200, description = "Attachment deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Attachment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_attachment(
    user: AuthenticatedUser,
    State(service): State<Arc<AttachmentService>>,
    Path((kind, owner_id, attachment_id)): Path<(AttachmentKind, Uuid, Uuid)>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    service.delete(kind, owner_id, attachment_id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedDto { deleted: true }),
        Some("Attachment deleted".to_string()),
        None,
    )))
}
