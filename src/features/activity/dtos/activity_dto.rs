use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::activity::models::UserActivity;

/// Filters for the activity log
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ActivityQueryParams {
    /// Only entries by this user
    pub user_id: Option<Uuid>,
    /// Only entries about this record
    pub entity_id: Option<Uuid>,
    /// Case-insensitive substring of the action name
    pub action: Option<String>,
    /// Case-insensitive substring of the entity type
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ActivityResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserActivity> for ActivityResponseDto {
    fn from(a: UserActivity) -> Self {
        Self {
            id: a.id,
            user_id: a.user_id,
            user_email: a.user_email,
            action: a.action,
            entity_type: a.entity_type,
            entity_id: a.entity_id,
            details: a.details,
            created_at: a.created_at,
        }
    }
}
