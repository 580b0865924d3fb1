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
use crate::features::technician_training::dtos::{
    CreateTrainingDto, TrainingQueryParams, TrainingResponseDto, UpdateTrainingDto,
};
use crate::features::technician_training::services::TrainingService;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// Record a technician training
#[utoipa::path(
    post,
    path = "/api/technician-trainings",
    request_body = CreateTrainingDto,
    responses(
        (status = 201, description = "Training record created", body = ApiResponse<TrainingResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "technician-trainings"
)]
pub async fn create_training(
    user: AuthenticatedUser,
    State(service): State<Arc<TrainingService>>,
    AppJson(dto): AppJson<CreateTrainingDto>,
) -> Result<(StatusCode, Json<ApiResponse<TrainingResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let training = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(training), None, None)),
    ))
}

/// Search technician trainings
#[utoipa::path(
    get,
    path = "/api/technician-trainings",
    params(TrainingQueryParams),
    responses(
        (status = 200, description = "Matching training records", body = ApiResponse<Vec<TrainingResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "technician-trainings"
)]
pub async fn list_trainings(
    _user: AuthenticatedUser,
    State(service): State<Arc<TrainingService>>,
    AppQuery(params): AppQuery<TrainingQueryParams>,
) -> Result<Json<ApiResponse<Vec<TrainingResponseDto>>>> {
    let trainings = service.search(&params).await?;
    Ok(Json(ApiResponse::list(trainings)))
}

/// Get a technician training by ID
#[utoipa::path(
    get,
    path = "/api/technician-trainings/{id}",
    params(("id" = Uuid, Path, description = "Training record ID")),
    responses(
        (status = 200, description = "Training record", body = ApiResponse<TrainingResponseDto>),
        (status = 404, description = "Training record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technician-trainings"
)]
pub async fn get_training(
    _user: AuthenticatedUser,
    State(service): State<Arc<TrainingService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TrainingResponseDto>>> {
    let training = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(training), None, None)))
}

/// Update a technician training
#[utoipa::path(
    patch,
    path = "/api/technician-trainings/{id}",
    params(("id" = Uuid, Path, description = "Training record ID")),
    request_body = UpdateTrainingDto,
    responses(
        (status = 200, description = "Training record updated", body = ApiResponse<TrainingResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Training record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technician-trainings"
)]
pub async fn update_training(
    user: AuthenticatedUser,
    State(service): State<Arc<TrainingService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTrainingDto>,
) -> Result<Json<ApiResponse<TrainingResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let training = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(training), None, None)))
}

/// Delete a technician training with its attachments
#[utoipa::path(
    delete,
    path = "/api/technician-trainings/{id}",
    params(("id" = Uuid, Path, description = "Training record ID")),
    responses(
        (status = 200, description = "Training record deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "Training record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technician-trainings"
)]
pub async fn delete_training(
    user: AuthenticatedUser,
    State(service): State<Arc<TrainingService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Training record deleted".to_string()),
        None,
    )))
}
