use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, response::Response, Router};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::UserDirectory;
use crate::modules::mail::{MailMessage, MailSender};
use crate::modules::storage::ObjectStore;

pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        id: Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001),
        email: "engineer@example.com".to_string(),
        name: "Test Engineer".to_string(),
    }
}

/// Insert the test user as a verified account so `created_by` style FKs resolve
pub async fn insert_test_user(pool: &PgPool) -> AuthenticatedUser {
    let user = create_test_user();
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, name, is_verified)
        VALUES ($1, $2, 'not-a-real-hash', $3, TRUE)
        "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.name)
    .execute(pool)
    .await
    .unwrap();
    user
}

async fn inject_test_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_user());
    next.run(request).await
}

pub fn with_test_user_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_test_user_middleware))
}

/// Object store kept in memory. Keys listed in `failing` reject removal.
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    failing: HashSet<String>,
}

impl InMemoryObjectStore {
    pub fn failing_on(keys: &[&str]) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            failing: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        if self.failing.contains(key) {
            return Err(AppError::Storage(format!("remove refused for {}", key)));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Mail sender that keeps every message it was asked to send
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
}

#[async_trait]
impl MailSender for RecordingMailer {
    async fn send(&self, message: MailMessage) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

/// Verified users known to the session layer
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Vec<AuthenticatedUser>,
}

impl InMemoryUserDirectory {
    pub fn with_users(users: Vec<AuthenticatedUser>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_session_user(&self, id: Uuid) -> Result<Option<AuthenticatedUser>, AppError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }
}
