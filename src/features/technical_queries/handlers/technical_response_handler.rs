use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::technical_queries::dtos::{
    CreateTechnicalResponseDto, TechnicalResponseDto, VoteCountsDto, VoteRequestDto,
};
use crate::features::technical_queries::routes::TechnicalQueriesState;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// Answer a technical query
#[utoipa::path(
    post,
    path = "/api/technical-queries/{id}/responses",
    params(("id" = Uuid, Path, description = "Technical query ID")),
    request_body = CreateTechnicalResponseDto,
    responses(
        (status = 201, description = "Response posted", body = ApiResponse<TechnicalResponseDto>),
        (status = 404, description = "Query not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn create_technical_response(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(query_id): Path<Uuid>,
    AppJson(dto): AppJson<CreateTechnicalResponseDto>,
) -> Result<(StatusCode, Json<ApiResponse<TechnicalResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = state.responses.create(query_id, dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Delete a technical response (author only)
#[utoipa::path(
    delete,
    path = "/api/technical-responses/{id}",
    params(("id" = Uuid, Path, description = "Technical response ID")),
    responses(
        (status = 200, description = "Response deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Response not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn delete_technical_response(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = state.responses.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Technical response deleted".to_string()),
        None,
    )))
}

/// Vote on a technical response
#[utoipa::path(
    post,
    path = "/api/technical-responses/{id}/vote",
    params(("id" = Uuid, Path, description = "Technical response ID")),
    request_body = VoteRequestDto,
    responses(
        (status = 200, description = "Vote counted", body = ApiResponse<VoteCountsDto>),
        (status = 404, description = "Response not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn vote_technical_response(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<VoteRequestDto>,
) -> Result<Json<ApiResponse<VoteCountsDto>>> {
    let counts = state.responses.vote(id, dto.direction, &user).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}
