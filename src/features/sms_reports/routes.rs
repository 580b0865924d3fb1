use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::sms_reports::handlers;
use crate::features::sms_reports::services::SmsReportService;

pub fn routes(service: Arc<SmsReportService>) -> Router {
    Router::new()
        .route(
            "/api/sms-reports",
            get(handlers::list_sms_reports).post(handlers::create_sms_report),
        )
        .route(
            "/api/sms-reports/{id}",
            get(handlers::get_sms_report)
                .patch(handlers::update_sms_report)
                .delete(handlers::delete_sms_report),
        )
        .with_state(service)
}
