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
use crate::features::stock_inventory::dtos::{
    CreateStockItemDto, StockItemQueryParams, StockItemResponseDto, UpdateStockItemDto,
};
use crate::features::stock_inventory::services::StockItemService;
use crate::shared::types::{ApiResponse, BulkDeleteRequestDto, BulkDeleteResultDto, RecordDeletedDto};

/// Add a stock item
#[utoipa::path(
    post,
    path = "/api/stock-inventory",
    request_body = CreateStockItemDto,
    responses(
        (status = 201, description = "Stock record created", body = ApiResponse<StockItemResponseDto>),
        (status = 400, description = "Validation error")
    ),
    security(("bearer_auth" = [])),
    tag = "stock-inventory"
)]
pub async fn create_stock_item(
    user: AuthenticatedUser,
    State(service): State<Arc<StockItemService>>,
    AppJson(dto): AppJson<CreateStockItemDto>,
) -> Result<(StatusCode, Json<ApiResponse<StockItemResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.create(dto, &user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(item), None, None)),
    ))
}

/// Search stock inventory
#[utoipa::path(
    get,
    path = "/api/stock-inventory",
    params(StockItemQueryParams),
    responses(
        (status = 200, description = "Matching stock records", body = ApiResponse<Vec<StockItemResponseDto>>)
    ),
    security(("bearer_auth" = [])),
    tag = "stock-inventory"
)]
pub async fn list_stock_items(
    _user: AuthenticatedUser,
    State(service): State<Arc<StockItemService>>,
    AppQuery(params): AppQuery<StockItemQueryParams>,
) -> Result<Json<ApiResponse<Vec<StockItemResponseDto>>>> {
    let items = service.search(&params).await?;
    Ok(Json(ApiResponse::list(items)))
}

/// Get a stock item by ID
#[utoipa::path(
    get,
    path = "/api/stock-inventory/{id}",
    params(("id" = Uuid, Path, description = "Stock record ID")),
    responses(
        (status = 200, description = "Stock record", body = ApiResponse<StockItemResponseDto>),
        (status = 404, description = "Stock record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stock-inventory"
)]
pub async fn get_stock_item(
    _user: AuthenticatedUser,
    State(service): State<Arc<StockItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StockItemResponseDto>>> {
    let item = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Update a stock record; linked inspections follow part identity changes
#[utoipa::path(
    patch,
    path = "/api/stock-inventory/{id}",
    params(("id" = Uuid, Path, description = "Stock record ID")),
    request_body = UpdateStockItemDto,
    responses(
        (status = 200, description = "Stock record updated", body = ApiResponse<StockItemResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Stock record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stock-inventory"
)]
pub async fn update_stock_item(
    user: AuthenticatedUser,
    State(service): State<Arc<StockItemService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateStockItemDto>,
) -> Result<Json<ApiResponse<StockItemResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let item = service.update(id, dto, &user).await?;
    Ok(Json(ApiResponse::success(Some(item), None, None)))
}

/// Delete a stock record; its inspections are kept and detached
#[utoipa::path(
    delete,
    path = "/api/stock-inventory/{id}",
    params(("id" = Uuid, Path, description = "Stock record ID")),
    responses(
        (status = 200, description = "Stock record deleted", body = ApiResponse<RecordDeletedDto>),
        (status = 404, description = "Stock record not found")
    ),
    security(("bearer_auth" = [])),
    tag = "stock-inventory"
)]
pub async fn delete_stock_item(
    user: AuthenticatedUser,
    State(service): State<Arc<StockItemService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RecordDeletedDto>>> {
    let deleted = service.delete(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(deleted),
        Some("Stock record deleted".to_string()),
        None,
    )))
}

/// Delete several stock records at once
#[utoipa::path(
    post,
    path = "/api/stock-inventory/bulk-delete",
    request_body = BulkDeleteRequestDto,
    responses(
        (status = 200, description = "Found records deleted; missing ids and file failures reported", body = ApiResponse<BulkDeleteResultDto>),
        (status = 400, description = "Empty or oversized id list")
    ),
    security(("bearer_auth" = [])),
    tag = "stock-inventory"
)]
pub async fn bulk_delete_stock_items(
    user: AuthenticatedUser,
    State(service): State<Arc<StockItemService>>,
    AppJson(dto): AppJson<BulkDeleteRequestDto>,
) -> Result<Json<ApiResponse<BulkDeleteResultDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = service.bulk_delete(&dto.ids, &user).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}
