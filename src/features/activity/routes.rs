use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::activity::handlers;
use crate::features::activity::services::ActivityService;

/// Create routes for the activity log (protected)
pub fn routes(service: Arc<ActivityService>) -> Router {
    Router::new()
        .route("/api/activities", get(handlers::list_activities))
        .route("/api/activities/me", get(handlers::list_my_activities))
        .with_state(service)
}
