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
use crate::features::sdr_reports::dtos::{
    CreateSdrReportDto, SdrReportQueryParams, SdrReportResponseDto, UpdateSdrReportDto,
};
use crate::features::sdr_reports::services::SdrReportService;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// File a service difficulty report
#[utoipa::path(
    post,
    path = "/api/sdr-reports",
    request_body = CreateSdrReportDto,
    responses(
        (status = 201, description = "SDR report created", body = ApiResponse<SdrReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Report number already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "sdr-reports"
)]
pub async fn create_sdr_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SdrReportService>>,
    AppJson(mut dto): AppJson<CreateSdrReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<SdrReportResponseDto>>)> {
    dto.aircraft_registration = dto.aircraft_registration.trim().to_uppercase();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report), None, None)),
    ))
}

/// Search service difficulty reports
#[utoipa::path(
    get,
    path = "/api/sdr-reports",
    params(SdrReportQueryParams),
    responses(
        (status = 200, description = "Matching SDR reports", body = ApiResponse<Vec<SdrReportResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "sdr-reports"
)]
pub async fn list_sdr_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<SdrReportService>>,
    AppQuery(params): AppQuery<SdrReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<SdrReportResponseDto>>>> {
    let reports = service.search(&params).await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// Get a service difficulty report by ID
#[utoipa::path(
    get,
    path = "/api/sdr-reports/{id}",
    params(("id" = Uuid, Path, description = "SDR report ID")),
    responses(
        (status = 200, description = "SDR report", body = ApiResponse<SdrReportResponseDto>),
        (status = 404, description = "SDR report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sdr-reports"
)]
pub async fn get_sdr_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<SdrReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SdrReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update a service difficulty report
#[utoipa::path(
    patch,
    path = "/api/sdr-reports/{id}",
    params(("id" = Uuid, Path, description = "SDR report ID")),
    request_body = UpdateSdrReportDto,
    responses(
        (status = 200, description = "SDR report updated", body = ApiResponse<SdrReportResponseDto>),
        (status = 404, description = "SDR report not found"),
        (status = 409, description = "Report number already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "sdr-reports"
)]
pub async fn update_sdr_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SdrReportService>>,
    Path(id): Path<Uuid>,
    AppJson(mut dto): AppJson<UpdateSdrReportDto>,
) -> Result<Json<ApiResponse<SdrReportResponseDto>>> {
    dto.aircraft_registration = dto
        .aircraft_registration
        .map(|r| r.trim().to_uppercase());
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a service difficulty report with its attachments
#[utoipa::path(
    delete,
    path = "/api/sdr-reports/{id}",
    params(("id" = Uuid, Path, description = "SDR report ID")),
    responses(
        (status = 200, description = "SDR report deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "SDR report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sdr-reports"
)]
pub async fn delete_sdr_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SdrReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("SDR report deleted".to_string()),
        None,
    )))
}
