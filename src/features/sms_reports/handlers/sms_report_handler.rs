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
use crate::features::sms_reports::dtos::{
    CreateSmsReportDto, SmsReportQueryParams, SmsReportResponseDto, UpdateSmsReportDto,
};
use crate::features::sms_reports::services::SmsReportService;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// File a safety management report
#[utoipa::path(
    post,
    path = "/api/sms-reports",
    request_body = CreateSmsReportDto,
    responses(
        (status = 201, description = "SMS report created", body = ApiResponse<SmsReportResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "sms-reports"
)]
pub async fn create_sms_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SmsReportService>>,
    AppJson(dto): AppJson<CreateSmsReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<SmsReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report), None, None)),
    ))
}

/// Search safety management reports
#[utoipa::path(
    get,
    path = "/api/sms-reports",
    params(SmsReportQueryParams),
    responses(
        (status = 200, description = "Matching SMS reports", body = ApiResponse<Vec<SmsReportResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "sms-reports"
)]
pub async fn list_sms_reports(
    _user: AuthenticatedUser,
    State(service): State<Arc<SmsReportService>>,
    AppQuery(params): AppQuery<SmsReportQueryParams>,
) -> Result<Json<ApiResponse<Vec<SmsReportResponseDto>>>> {
    let reports = service.search(&params).await?;
    Ok(Json(ApiResponse::list(reports)))
}

/// Get a safety management report by ID
#[utoipa::path(
    get,
    path = "/api/sms-reports/{id}",
    params(("id" = Uuid, Path, description = "SMS report ID")),
    responses(
        (status = 200, description = "SMS report", body = ApiResponse<SmsReportResponseDto>),
        (status = 404, description = "SMS report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sms-reports"
)]
pub async fn get_sms_report(
    _user: AuthenticatedUser,
    State(service): State<Arc<SmsReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SmsReportResponseDto>>> {
    let report = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Update a safety management report
#[utoipa::path(
    patch,
    path = "/api/sms-reports/{id}",
    params(("id" = Uuid, Path, description = "SMS report ID")),
    request_body = UpdateSmsReportDto,
    responses(
        (status = 200, description = "SMS report updated", body = ApiResponse<SmsReportResponseDto>),
        (status = 404, description = "SMS report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sms-reports"
)]
pub async fn update_sms_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SmsReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSmsReportDto>,
) -> Result<Json<ApiResponse<SmsReportResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Delete a safety management report with its attachments
#[utoipa::path(
    delete,
    path = "/api/sms-reports/{id}",
    params(("id" = Uuid, Path, description = "SMS report ID")),
    responses(
        (status = 200, description = "SMS report deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "SMS report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "sms-reports"
)]
pub async fn delete_sms_report(
    user: AuthenticatedUser,
    State(service): State<Arc<SmsReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("SMS report deleted".to_string()),
        None,
    )))
}
