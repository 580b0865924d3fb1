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
use crate::features::airports::dtos::{
    normalize_code, AirportQueryParams, AirportResponseDto, CreateAirportDto, UpdateAirportDto,
};
use crate::features::airports::services::AirportService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::{ApiResponse, DeletedDto};

/// Register an airport
#[utoipa::path(
    post,
    path = "/api/airports",
    request_body = CreateAirportDto,
    responses(
        (status = 201, description = "Airport created", body = ApiResponse<AirportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Airport code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "airports"
)]
pub async fn create_airport(
    user: AuthenticatedUser,
    State(service): State<Arc<AirportService>>,
    AppJson(mut dto): AppJson<CreateAirportDto>,
) -> Result<(StatusCode, Json<ApiResponse<AirportResponseDto>>)> {
    dto.code = normalize_code(&dto.code);
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let airport = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(airport), None, None)),
    ))
}

/// Search airports
#[utoipa::path(
    get,
    path = "/api/airports",
    params(AirportQueryParams),
    responses(
        (status = 200, description = "Matching airports", body = ApiResponse<Vec<AirportResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "airports"
)]
pub async fn list_airports(
    _user: AuthenticatedUser,
    State(service): State<Arc<AirportService>>,
    AppQuery(params): AppQuery<AirportQueryParams>,
) -> Result<Json<ApiResponse<Vec<AirportResponseDto>>>> {
    let airports = service.search(&params).await?;
    Ok(Json(ApiResponse::list(airports)))
}

/// Get an airport by ID
#[utoipa::path(
    get,
    path = "/api/airports/{id}",
    params(("id" = Uuid, Path, description = "Airport ID")),
    responses(
        (status = 200, description = "Airport", body = ApiResponse<AirportResponseDto>),
        (status = 404, description = "Airport not found")
    ),
    security(("bearer_auth" = [])),
    tag = "airports"
)]
pub async fn get_airport(
    _user: AuthenticatedUser,
    State(service): State<Arc<AirportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AirportResponseDto>>> {
    let airport = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(airport), None, None)))
}

/// Update an airport
#[utoipa::path(
    patch,
    path = "/api/airports/{id}",
    params(("id" = Uuid, Path, description = "Airport ID")),
    request_body = UpdateAirportDto,
    responses(
        (status = 200, description = "Airport updated", body = ApiResponse<AirportResponseDto>),
        (status = 404, description = "Airport not found"),
        (status = 409, description = "Airport code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "airports"
)]
pub async fn update_airport(
    user: AuthenticatedUser,
    State(service): State<Arc<AirportService>>,
    Path(id): Path<Uuid>,
    AppJson(mut dto): AppJson<UpdateAirportDto>,
) -> Result<Json<ApiResponse<AirportResponseDto>>> {
    dto.code = dto.code.as_deref().map(normalize_code);
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let airport = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(airport), None, None)))
}

/// Delete an airport
#[utoipa::path(
    delete,
    path = "/api/airports/{id}",
    params(("id" = Uuid, Path, description = "Airport ID")),
    responses(
        (status = 200, description = "Airport deleted", body = ApiResponse<DeletedDto>),
        (status = 404, description = "Airport not found")
    ),
    security(("bearer_auth" = [])),
    tag = "airports"
)]
pub async fn delete_airport(
    user: AuthenticatedUser,
    State(service): State<Arc<AirportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeletedDto>>> {
    service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(DeletedDto { deleted: true }),
        Some("Airport deleted".to_string()),
        None,
    )))
}
