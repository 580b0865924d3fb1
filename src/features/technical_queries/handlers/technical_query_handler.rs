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
use crate::features::technical_queries::dtos::{
    CreateTechnicalQueryDto, TechnicalQueryDetailDto, TechnicalQueryParams,
    TechnicalQueryResponseDto, UpdateTechnicalQueryDto, VoteCountsDto, VoteRequestDto,
};
use crate::features::technical_queries::routes::TechnicalQueriesState;
use crate::shared::types::{ApiResponse, RecordDeletedDto};

/// Ask a technical query
#[utoipa::path(
    post,
    path = "/api/technical-queries",
    request_body = CreateTechnicalQueryDto,
    responses(
        (status = 201, description = "Query created", body = ApiResponse<TechnicalQueryResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn create_technical_query(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    AppJson(dto): AppJson<CreateTechnicalQueryDto>,
) -> Result<(StatusCode, Json<ApiResponse<TechnicalQueryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let query = state.queries.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(query), None, None)),
    ))
}

/// Search technical queries
#[utoipa::path(
    get,
    path = "/api/technical-queries",
    params(TechnicalQueryParams),
    responses(
        (status = 200, description = "Matching queries", body = ApiResponse<Vec<TechnicalQueryResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn list_technical_queries(
    _user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    AppQuery(params): AppQuery<TechnicalQueryParams>,
) -> Result<Json<ApiResponse<Vec<TechnicalQueryResponseDto>>>> {
    let queries = state.queries.search(&params).await?;
    Ok(Json(ApiResponse::list(queries)))
}

/// Get a query with all its responses
#[utoipa::path(
    get,
    path = "/api/technical-queries/{id}",
    params(("id" = Uuid, Path, description = "Technical query ID")),
    responses(
        (status = 200, description = "Query with responses", body = ApiResponse<TechnicalQueryDetailDto>),
        (status = 404, description = "Query not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn get_technical_query(
    _user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TechnicalQueryDetailDto>>> {
    let detail = state.queries.get_with_responses(id).await?;
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// Update a technical query (author only)
#[utoipa::path(
    patch,
    path = "/api/technical-queries/{id}",
    params(("id" = Uuid, Path, description = "Technical query ID")),
    request_body = UpdateTechnicalQueryDto,
    responses(
        (status = 200, description = "Query updated", body = ApiResponse<TechnicalQueryResponseDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Query not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn update_technical_query(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateTechnicalQueryDto>,
) -> Result<Json<ApiResponse<TechnicalQueryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let query = state.queries.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(query), None, None)))
}

/// Delete a technical query (author only)
#[utoipa::path(
    delete,
    path = "/api/technical-queries/{id}",
    params(("id" = Uuid, Path, description = "Technical query ID")),
    responses(
        (status = 200, description = "Query deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Query not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn delete_technical_query(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = state.queries.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Technical query deleted".to_string()),
        None,
    )))
}

/// Vote on a technical query
#[utoipa::path(
    post,
    path = "/api/technical-queries/{id}/vote",
    params(("id" = Uuid, Path, description = "Technical query ID")),
    request_body = VoteRequestDto,
    responses(
        (status = 200, description = "Vote counted", body = ApiResponse<VoteCountsDto>),
        (status = 404, description = "Query not found")
    ),
    security(("bearer_auth" = [])),
    tag = "technical-queries"
)]
pub async fn vote_technical_query(
    user: AuthenticatedUser,
    State(state): State<TechnicalQueriesState>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<VoteRequestDto>,
) -> Result<Json<ApiResponse<VoteCountsDto>>> {
    let counts = state.queries.vote(id, dto.direction, &user).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}
