use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::dtos::{ActivityQueryParams, ActivityResponseDto};
use crate::features::activity::models::UserActivity;
use crate::shared::search::{SearchLimits, TextFilters};

/// One entry for the activity log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub user_id: Uuid,
    pub action: &'static str,
    pub entity_type: Option<&'static str>,
    pub entity_id: Option<Uuid>,
    pub details: Option<String>,
}

impl ActivityEntry {
    pub fn new(user_id: Uuid, action: &'static str) -> Self {
        Self {
            user_id,
            action,
            entity_type: None,
            entity_id: None,
            details: None,
        }
    }

    pub fn entity(mut self, entity_type: &'static str, entity_id: Uuid) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = Some(entity_id);
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Service for the append-only activity log
pub struct ActivityService {
    pool: PgPool,
    limits: SearchLimits,
}

impl ActivityService {
    pub fn new(pool: PgPool, limits: SearchLimits) -> Self {
        Self { pool, limits }
    }

    /// Append an entry. Failures are logged and swallowed.
    pub async fn record(&self, entry: ActivityEntry) {
        let result = sqlx::query(
            r#"
            INSERT INTO user_activities (user_id, action, entity_type, entity_id, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.action)
        .bind(entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.details)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => debug!(
                "Activity recorded: user={}, action={}, entity={:?}",
                entry.user_id, entry.action, entry.entity_id
            ),
            Err(e) => warn!(
                "Failed to record activity (user={}, action={}): {}",
                entry.user_id, entry.action, e
            ),
        }
    }

    /// List the most recent entries matching the filters
    pub async fn list(&self, params: &ActivityQueryParams) -> Result<Vec<ActivityResponseDto>> {
        let mut qb = build_list_query(params, self.limits);

        let rows: Vec<UserActivity> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list activities: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(rows.into_iter().map(ActivityResponseDto::from).collect())
    }
}

fn build_list_query<'a>(
    params: &ActivityQueryParams,
    limits: SearchLimits,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"SELECT a.id, a.user_id, u.email AS user_email, a.action, a.entity_type,
                  a.entity_id, a.details, a.created_at
           FROM user_activities a
           LEFT JOIN users u ON u.id = a.user_id"#,
    );

    let mut has_where = false;
    if let Some(user_id) = params.user_id {
        qb.push(" WHERE a.user_id = ");
        qb.push_bind(user_id);
        has_where = true;
    }
    if let Some(entity_id) = params.entity_id {
        qb.push(if has_where { " AND " } else { " WHERE " });
        qb.push("a.entity_id = ");
        qb.push_bind(entity_id);
        has_where = true;
    }

    let filters = TextFilters::new()
        .with("a.action", params.action.as_deref())
        .with("a.entity_type", params.entity_type.as_deref());
    filters.push_conditions(&mut qb, has_where);

    let narrowed = has_where || !filters.is_empty();
    qb.push(" ORDER BY a.created_at DESC LIMIT ");
    qb.push_bind(if narrowed {
        limits.max_results
    } else {
        limits.page_size
    });
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_builder() {
        let user = Uuid::new_v4();
        let record = Uuid::new_v4();
        let entry = ActivityEntry::new(user, "delete")
            .entity("stock_inventory", record)
            .details("P/N 123");

        assert_eq!(entry.user_id, user);
        assert_eq!(entry.entity_type, Some("stock_inventory"));
        assert_eq!(entry.entity_id, Some(record));
        assert_eq!(entry.details.as_deref(), Some("P/N 123"));
    }

    #[test]
    fn test_list_query_unfiltered_uses_page_size() {
        let qb = build_list_query(&ActivityQueryParams::default(), SearchLimits::new(50, 500));
        let sql = qb.sql();
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY a.created_at DESC LIMIT $1"));
    }

    #[test]
    fn test_list_query_combines_exact_and_text_filters() {
        let params = ActivityQueryParams {
            user_id: Some(Uuid::new_v4()),
            entity_id: None,
            action: Some("upload".to_string()),
            entity_type: None,
        };
        let qb = build_list_query(&params, SearchLimits::new(50, 500));
        let sql = qb.sql();
        assert!(sql.contains("WHERE a.user_id = $1 AND a.action ILIKE $2"));
        assert!(sql.ends_with("LIMIT $3"));
    }
}
