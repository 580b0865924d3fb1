use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    CreateFolderDto, FolderContentsDto, FolderContentsQuery, FolderResponseDto, FolderTreeDto,
    UpdateFolderDto,
};
use crate::features::documents::routes::DocumentsState;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// Create a document folder
#[utoipa::path(
    post,
    path = "/api/documents/folders",
    request_body = CreateFolderDto,
    responses(
        (status = 201, description = "Folder created", body = ApiResponse<FolderResponseDto>),
        (status = 404, description = "Parent folder not found"),
        (status = 409, description = "Name already used by a sibling folder")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn create_folder(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    AppJson(dto): AppJson<CreateFolderDto>,
) -> Result<(StatusCode, Json<ApiResponse<FolderResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let folder = state.folders.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(folder), None, None)),
    ))
}

/// Rename a folder or move it under another parent
#[utoipa::path(
    patch,
    path = "/api/documents/folders/{id}",
    params(("id" = Uuid, Path, description = "Folder ID")),
    request_body = UpdateFolderDto,
    responses(
        (status = 200, description = "Folder updated", body = ApiResponse<FolderResponseDto>),
        (status = 400, description = "Move would create a cycle"),
        (status = 404, description = "Folder or new parent not found"),
        (status = 409, description = "Name already used by a sibling folder")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn update_folder(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFolderDto>,
) -> Result<Json<ApiResponse<FolderResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let folder = state.folders.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(folder), None, None)))
}

/// Delete a folder, its subfolders and every file below it
#[utoipa::path(
    delete,
    path = "/api/documents/folders/{id}",
    params(("id" = Uuid, Path, description = "Folder ID")),
    responses(
        (status = 200, description = "Folder deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "Folder not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn delete_folder(
    user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = state.folders.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Folder deleted".to_string()),
        None,
    )))
}

/// List the subfolders and files of a folder
#[utoipa::path(
    get,
    path = "/api/documents/contents",
    params(FolderContentsQuery),
    responses(
        (status = 200, description = "Folder contents", body = ApiResponse<FolderContentsDto>),
        (status = 404, description = "Folder not found")
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn get_folder_contents(
    _user: AuthenticatedUser,
    State(state): State<DocumentsState>,
    AppQuery(query): AppQuery<FolderContentsQuery>,
) -> Result<Json<ApiResponse<FolderContentsDto>>> {
    let contents = state.folders.contents(query.folder_id).await?;
    Ok(Json(ApiResponse::success(Some(contents), None, None)))
}

/// Get the full folder tree
#[utoipa::path(
    get,
    path = "/api/documents/tree",
    responses(
        (status = 200, description = "Full folder tree", body = ApiResponse<Vec<FolderTreeDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn get_folder_tree(
    _user: AuthenticatedUser,
    State(state): State<DocumentsState>,
) -> Result<Json<ApiResponse<Vec<FolderTreeDto>>>> {
    let tree = state.folders.tree().await?;
    Ok(Json(ApiResponse::list(tree)))
}
