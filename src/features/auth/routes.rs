use crate::features::auth::handlers;
use crate::features::auth::services::AuthService;
use crate::features::auth::session::SessionCookies;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub service: Arc<AuthService>,
    pub cookies: SessionCookies,
}

/// Public auth routes (no authentication required)
pub fn public_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/resend-pin", post(handlers::resend_pin))
        .route("/api/auth/verify-pin", post(handlers::verify_pin))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .with_state(state)
}

/// Protected auth routes (require a session)
pub fn protected_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(state)
}
