use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::stock_inventory::handlers;
use crate::features::stock_inventory::services::StockItemService;

/// Stock inventory routes (protected)
pub fn routes(service: Arc<StockItemService>) -> Router {
    Router::new()
        .route(
            "/api/stock-inventory",
            get(handlers::list_stock_items).post(handlers::create_stock_item),
        )
        .route(
            "/api/stock-inventory/bulk-delete",
            post(handlers::bulk_delete_stock_items),
        )
        .route(
            "/api/stock-inventory/{id}",
            get(handlers::get_stock_item)
                .patch(handlers::update_stock_item)
                .delete(handlers::delete_stock_item),
        )
        .with_state(service)
}
