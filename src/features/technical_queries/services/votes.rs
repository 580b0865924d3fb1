use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::technical_queries::dtos::{VoteCountsDto, VoteDirection};

/// Tables that carry vote counters
#[derive(Debug, Clone, Copy)]
pub(super) enum VoteTarget {
    Query,
    Response,
}

impl VoteTarget {
    fn table(self) -> &'static str {
        match self {
            VoteTarget::Query => "technical_queries",
            VoteTarget::Response => "technical_responses",
        }
    }

    fn label(self) -> &'static str {
        match self {
            VoteTarget::Query => "Technical query",
            VoteTarget::Response => "Technical response",
        }
    }
}

/// Increment one counter in a single statement
pub(super) async fn apply_vote(
    pool: &PgPool,
    target: VoteTarget,
    id: Uuid,
    direction: VoteDirection,
) -> Result<VoteCountsDto> {
    let column = direction.column();
    sqlx::query_as::<_, VoteCountsDto>(&format!(
        "UPDATE {table} SET {column} = {column} + 1 WHERE id = $1 RETURNING id, upvotes, downvotes",
        table = target.table(),
        column = column
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("{} {} not found", target.label(), id)))
}

/// Only the author may change or remove their own post
pub(super) fn ensure_author(author_id: Uuid, user: &AuthenticatedUser, what: &str) -> Result<()> {
    if author_id == user.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Only the author can modify this {}",
            what
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::create_test_user;

    #[test]
    fn test_ensure_author() {
        let user = create_test_user();
        assert!(ensure_author(user.id, &user, "query").is_ok());

        let err = ensure_author(Uuid::new_v4(), &user, "query").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
