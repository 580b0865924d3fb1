use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::session::UserDirectory;

/// Session lookups against the `users` table
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_session_user(&self, id: Uuid) -> Result<Option<AuthenticatedUser>, AppError> {
        let row = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, email, name FROM users WHERE id = $1 AND is_verified = TRUE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, email, name)| AuthenticatedUser { id, email, name }))
    }
}
