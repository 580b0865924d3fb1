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
use crate::features::flight_records::dtos::{
    CreateFlightRecordDto, FlightRecordQueryParams, FlightRecordResponseDto,
    UpdateFlightRecordDto,
};
use crate::features::flight_records::services::FlightRecordService;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// Log a flight
#[utoipa::path(
    post,
    path = "/api/flight-records",
    request_body = CreateFlightRecordDto,
    responses(
        (status = 201, description = "Flight record created", body = ApiResponse<FlightRecordResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "flight-records"
)]
pub async fn create_flight_record(
    user: AuthenticatedUser,
    State(service): State<Arc<FlightRecordService>>,
    AppJson(dto): AppJson<CreateFlightRecordDto>,
) -> Result<(StatusCode, Json<ApiResponse<FlightRecordResponseDto>>)> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(record), None, None)),
    ))
}

/// List or search flight records
#[utoipa::path(
    get,
    path = "/api/flight-records",
    params(FlightRecordQueryParams),
    responses(
        (status = 200, description = "Matching flight records, most recent first", body = ApiResponse<Vec<FlightRecordResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "flight-records"
)]
pub async fn list_flight_records(
    _user: AuthenticatedUser,
    State(service): State<Arc<FlightRecordService>>,
    AppQuery(params): AppQuery<FlightRecordQueryParams>,
) -> Result<Json<ApiResponse<Vec<FlightRecordResponseDto>>>> {
    let records = service.search(&params).await?;
    Ok(Json(ApiResponse::list(records)))
}

/// Get a flight record by ID
#[utoipa::path(
    get,
    path = "/api/flight-records/{id}",
    params(("id" = Uuid, Path, description = "Flight record ID")),
    responses(
        (status = 200, description = "Flight record", body = ApiResponse<FlightRecordResponseDto>),
        (status = 404, description = "Flight record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "flight-records"
)]
pub async fn get_flight_record(
    _user: AuthenticatedUser,
    State(service): State<Arc<FlightRecordService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FlightRecordResponseDto>>> {
    let record = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Update a flight record
#[utoipa::path(
    patch,
    path = "/api/flight-records/{id}",
    params(("id" = Uuid, Path, description = "Flight record ID")),
    request_body = UpdateFlightRecordDto,
    responses(
        (status = 200, description = "Flight record updated", body = ApiResponse<FlightRecordResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Flight record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "flight-records"
)]
pub async fn update_flight_record(
    user: AuthenticatedUser,
    State(service): State<Arc<FlightRecordService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFlightRecordDto>,
) -> Result<Json<ApiResponse<FlightRecordResponseDto>>> {
    let dto = dto.normalized();
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let record = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(record), None, None)))
}

/// Delete a flight record together with its attachments
#[utoipa::path(
    delete,
    path = "/api/flight-records/{id}",
    params(("id" = Uuid, Path, description = "Flight record ID")),
    responses(
        (status = 200, description = "Flight record deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "Flight record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "flight-records"
)]
pub async fn delete_flight_record(
    user: AuthenticatedUser,
    State(service): State<Arc<FlightRecordService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Flight record deleted".to_string()),
        None,
    )))
}
