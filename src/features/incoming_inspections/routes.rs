use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::incoming_inspections::handlers;
use crate::features::incoming_inspections::services::IncomingInspectionService;

/// Incoming inspection routes (protected)
pub fn routes(service: Arc<IncomingInspectionService>) -> Router {
    Router::new()
        .route(
            "/api/incoming-inspections",
            get(handlers::list_inspections).post(handlers::create_inspection),
        )
        .route(
            "/api/incoming-inspections/{id}",
            get(handlers::get_inspection)
                .patch(handlers::update_inspection)
                .delete(handlers::delete_inspection),
        )
        .with_state(service)
}
