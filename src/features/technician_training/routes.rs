use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::technician_training::handlers;
use crate::features::technician_training::services::TrainingService;

pub fn routes(service: Arc<TrainingService>) -> Router {
    Router::new()
        .route(
            "/api/technician-trainings",
            get(handlers::list_trainings).post(handlers::create_training),
        )
        .route(
            "/api/technician-trainings/{id}",
            get(handlers::get_training)
                .patch(handlers::update_training)
                .delete(handlers::delete_training),
        )
        .with_state(service)
}
