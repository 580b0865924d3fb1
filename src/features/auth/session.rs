use async_trait::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;
use uuid::Uuid;

use super::jwt::JwtService;
use super::model::AuthenticatedUser;
use crate::core::error::AppError;

/// Lookup of users that may hold a session
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Return the user only if it exists and has verified its email
    async fn find_session_user(&self, id: Uuid) -> Result<Option<AuthenticatedUser>, AppError>;
}

/// Turns a session token into the user it belongs to
pub struct SessionResolver {
    jwt: Arc<JwtService>,
    directory: Arc<dyn UserDirectory>,
    cookie_name: String,
}

impl SessionResolver {
    pub fn new(
        jwt: Arc<JwtService>,
        directory: Arc<dyn UserDirectory>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            jwt,
            directory,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub async fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.jwt.verify(token)?;

        self.directory
            .find_session_user(claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Session token names unknown or unverified user {}", claims.sub);
                AppError::Unauthorized("Invalid or expired session".to_string())
            })
    }
}

/// Builds the session cookie and its removal counterpart
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
    max_age_secs: i64,
}

impl SessionCookies {
    pub fn new(name: impl Into<String>, secure: bool, max_age_secs: i64) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age_secs,
        }
    }

    pub fn issue(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.max_age_secs))
            .build()
    }

    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), String::new()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::ZERO)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::middleware::auth_middleware;
    use crate::shared::test_helpers::InMemoryUserDirectory;
    use axum::{
        http::{header, HeaderValue, StatusCode},
        middleware, routing::get, Json, Router,
    };
    use axum_test::TestServer;
    use chrono::Utc;
    use std::time::Duration;

    const SECRET: &str = "session-test-secret-0123456789abcdef";

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "inspector@example.com".to_string(),
            name: "Inspector".to_string(),
        }
    }

    async fn whoami(user: AuthenticatedUser) -> Json<AuthenticatedUser> {
        Json(user)
    }

    fn server(jwt: Arc<JwtService>, directory: InMemoryUserDirectory) -> TestServer {
        let resolver = Arc::new(SessionResolver::new(jwt, Arc::new(directory), "token"));
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(resolver, auth_middleware));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let jwt = Arc::new(JwtService::new(SECRET, Duration::from_secs(600)));
        let server = server(jwt, InMemoryUserDirectory::default());

        let response = server.get("/whoami").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_cookie_token_resolves_user() {
        let jwt = Arc::new(JwtService::new(SECRET, Duration::from_secs(600)));
        let user = user();
        let token = jwt.issue(user.id, &user.email).unwrap();
        let server = server(jwt, InMemoryUserDirectory::with_users(vec![user.clone()]));

        let response = server
            .get("/whoami")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("token={}", token)).unwrap(),
            )
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.json::<AuthenticatedUser>(), user);
    }

    #[tokio::test]
    async fn test_bearer_token_resolves_user() {
        let jwt = Arc::new(JwtService::new(SECRET, Duration::from_secs(600)));
        let user = user();
        let token = jwt.issue(user.id, &user.email).unwrap();
        let server = server(jwt, InMemoryUserDirectory::with_users(vec![user.clone()]));

        let response = server
            .get("/whoami")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            )
            .await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let jwt = Arc::new(JwtService::new(SECRET, Duration::from_secs(60)));
        let user = user();
        let token = jwt
            .issue_at(user.id, &user.email, Utc::now() - chrono::Duration::hours(1))
            .unwrap();
        let server = server(jwt, InMemoryUserDirectory::with_users(vec![user]));

        let response = server
            .get("/whoami")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("token={}", token)).unwrap(),
            )
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_token_for_unknown_user_is_unauthorized() {
        let jwt = Arc::new(JwtService::new(SECRET, Duration::from_secs(600)));
        let token = jwt.issue(Uuid::new_v4(), "ghost@example.com").unwrap();
        let server = server(jwt, InMemoryUserDirectory::default());

        let response = server
            .get("/whoami")
            .add_header(
                header::COOKIE,
                HeaderValue::from_str(&format!("token={}", token)).unwrap(),
            )
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookies = SessionCookies::new("token", true, 3600);

        let cookie = cookies.issue("abc".to_string());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));

        let cleared = cookies.clear();
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(time::Duration::ZERO));
    }
}
