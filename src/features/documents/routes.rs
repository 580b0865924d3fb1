use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::features::documents::handlers;
use crate::features::documents::services::{DocumentFileService, FolderService};
use crate::shared::constants::MAX_UPLOAD_SIZE;

#[derive(Clone)]
pub struct DocumentsState {
    pub folders: Arc<FolderService>,
    pub files: Arc<DocumentFileService>,
}

pub fn routes(state: DocumentsState) -> Router {
    Router::new()
        .route("/api/documents/tree", get(handlers::get_folder_tree))
        .route("/api/documents/contents", get(handlers::get_folder_contents))
        .route("/api/documents/folders", post(handlers::create_folder))
        .route(
            "/api/documents/folders/{id}",
            patch(handlers::update_folder).delete(handlers::delete_folder),
        )
        .route("/api/documents/files", post(handlers::upload_document))
        .route(
            "/api/documents/files/{id}",
            get(handlers::get_document).delete(handlers::delete_document),
        )
        .route(
            "/api/documents/files/{id}/download",
            get(handlers::download_document),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE + 64 * 1024))
        .with_state(state)
}
