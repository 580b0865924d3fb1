use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::airports::handlers;
use crate::features::airports::services::AirportService;

/// Airport registry routes (protected)
pub fn routes(service: Arc<AirportService>) -> Router {
    Router::new()
        .route(
            "/api/airports",
            get(handlers::list_airports).post(handlers::create_airport),
        )
        .route(
            "/api/airports/{id}",
            get(handlers::get_airport)
                .patch(handlers::update_airport)
                .delete(handlers::delete_airport),
        )
        .with_state(service)
}
