use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::incoming_inspections::dtos::{
    CreateIncomingInspectionDto, IncomingInspectionQueryParams, IncomingInspectionResponseDto,
    UpdateIncomingInspectionDto,
};
use crate::features::incoming_inspections::services::IncomingInspectionService;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// Record an incoming inspection
#[utoipa::path(
    post,
    path = "/api/incoming-inspections",
    request_body = CreateIncomingInspectionDto,
    responses(
        (status = 201, description = "Inspection created", body = ApiResponse<IncomingInspectionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Referenced stock record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incoming-inspections"
)]
pub async fn create_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<IncomingInspectionService>>,
    AppJson(dto): AppJson<CreateIncomingInspectionDto>,
) -> Result<(StatusCode, Json<ApiResponse<IncomingInspectionResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let inspection = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(inspection), None, None)),
    ))
}

/// Search incoming inspections
#[utoipa::path(
    get,
    path = "/api/incoming-inspections",
    params(IncomingInspectionQueryParams),
    responses(
        (status = 200, description = "Matching inspections", body = ApiResponse<Vec<IncomingInspectionResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "incoming-inspections"
)]
pub async fn list_inspections(
    _user: AuthenticatedUser,
    State(service): State<Arc<IncomingInspectionService>>,
    AppQuery(params): AppQuery<IncomingInspectionQueryParams>,
) -> Result<Json<ApiResponse<Vec<IncomingInspectionResponseDto>>>> {
    let inspections = service.search(&params).await?;
    Ok(Json(ApiResponse::list(inspections)))
}

/// Get an incoming inspection by ID
#[utoipa::path(
    get,
    path = "/api/incoming-inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Inspection", body = ApiResponse<IncomingInspectionResponseDto>),
        (status = 404, description = "Inspection not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incoming-inspections"
)]
pub async fn get_inspection(
    _user: AuthenticatedUser,
    State(service): State<Arc<IncomingInspectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<IncomingInspectionResponseDto>>> {
    let inspection = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(inspection), None, None)))
}

/// Update an incoming inspection
#[utoipa::path(
    patch,
    path = "/api/incoming-inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    request_body = UpdateIncomingInspectionDto,
    responses(
        (status = 200, description = "Inspection updated", body = ApiResponse<IncomingInspectionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Inspection not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incoming-inspections"
)]
pub async fn update_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<IncomingInspectionService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateIncomingInspectionDto>,
) -> Result<Json<ApiResponse<IncomingInspectionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let inspection = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(inspection), None, None)))
}

/// Delete an incoming inspection with its attachments
#[utoipa::path(
    delete,
    path = "/api/incoming-inspections/{id}",
    params(("id" = Uuid, Path, description = "Inspection ID")),
    responses(
        (status = 200, description = "Inspection deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "Inspection not found")
    ),
    security(("bearer_auth" = [])),
    tag = "incoming-inspections"
)]
pub async fn delete_inspection(
    user: AuthenticatedUser,
    State(service): State<Arc<IncomingInspectionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Inspection deleted".to_string()),
        None,
    )))
}
