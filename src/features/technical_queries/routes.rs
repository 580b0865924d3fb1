use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::technical_queries::handlers;
use crate::features::technical_queries::services::{
    TechnicalQueryService, TechnicalResponseService,
};

#[derive(Clone)]
pub struct TechnicalQueriesState {
    pub queries: Arc<TechnicalQueryService>,
    pub responses: Arc<TechnicalResponseService>,
}

pub fn routes(state: TechnicalQueriesState) -> Router {
    Router::new()
        .route(
            "/api/technical-queries",
            get(handlers::list_technical_queries).post(handlers::create_technical_query),
        )
        .route(
            "/api/technical-queries/{id}",
            get(handlers::get_technical_query)
                .patch(handlers::update_technical_query)
                .delete(handlers::delete_technical_query),
        )
        .route(
            "/api/technical-queries/{id}/responses",
            post(handlers::create_technical_response),
        )
        .route(
            "/api/technical-queries/{id}/vote",
            post(handlers::vote_technical_query),
        )
        .route(
            "/api/technical-responses/{id}",
            delete(handlers::delete_technical_response),
        )
        .route(
            "/api/technical-responses/{id}/vote",
            post(handlers::vote_technical_response),
        )
        .with_state(state)
}
