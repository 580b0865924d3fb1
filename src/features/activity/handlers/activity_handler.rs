use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::activity::dtos::{ActivityQueryParams, ActivityResponseDto};
use crate::features::activity::services::ActivityService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// List recent activity, optionally filtered
#[utoipa::path(
    get,
    path = "/api/activities",
    params(ActivityQueryParams),
    responses(
        (status = 200, description = "Recent activity entries", body = ApiResponse<Vec<ActivityResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "activities"
)]
pub async fn list_activities(
    _user: AuthenticatedUser,
    State(service): State<Arc<ActivityService>>,
    AppQuery(params): AppQuery<ActivityQueryParams>,
) -> Result<Json<ApiResponse<Vec<ActivityResponseDto>>>> {
    let entries = service.list(&params).await?;
    Ok(Json(ApiResponse::list(entries)))
}

/// List the caller's own activity
#[utoipa::path(
    get,
    path = "/api/activities/me",
    responses(
        (status = 200, description = "Caller's recent activity", body = ApiResponse<Vec<ActivityResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "activities"
)]
pub async fn list_my_activities(
    user: AuthenticatedUser,
    State(service): State<Arc<ActivityService>>,
) -> Result<Json<ApiResponse<Vec<ActivityResponseDto>>>> {
    let params = ActivityQueryParams {
        user_id: Some(user.id),
        ..Default::default()
    };
    let entries = service.list(&params).await?;
    Ok(Json(ApiResponse::list(entries)))
}
