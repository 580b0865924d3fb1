use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::attachments::handlers;
use crate::features::attachments::services::AttachmentService;
use crate::shared::constants::MAX_UPLOAD_SIZE;

/// Attachment routes for every record family (protected)
pub fn routes(service: Arc<AttachmentService>) -> Router {
    Router::new()
        .route(
            "/api/attachments/{kind}/{owner_id}",
            get(handlers::list_attachments).post(handlers::upload_attachment),
        )
        .route(
            "/api/attachments/{kind}/{owner_id}/{attachment_id}",
            get(handlers::download_attachment).delete(handlers::delete_attachment),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 64 * 1024))
        .with_state(service)
}
