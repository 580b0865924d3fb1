use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::sdr_reports::handlers;
use crate::features::sdr_reports::services::SdrReportService;

pub fn routes(service: Arc<SdrReportService>) -> Router {
    Router::new()
        .route(
            "/api/sdr-reports",
            get(handlers::list_sdr_reports).post(handlers::create_sdr_report),
        )
        .route(
            "/api/sdr-reports/{id}",
            get(handlers::get_sdr_report)
                .patch(handlers::update_sdr_report)
                .delete(handlers::delete_sdr_report),
        )
        .with_state(service)
}
