use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Counter column incremented by this vote
    pub fn column(self) -> &'static str {
        match self {
            VoteDirection::Up => "upvotes",
            VoteDirection::Down => "downvotes",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequestDto {
    pub direction: VoteDirection,
}

/// Counters after a vote was applied
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct VoteCountsDto {
    pub id: Uuid,
    pub upvotes: i32,
    pub downvotes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_json() {
        let up: VoteRequestDto = serde_json::from_str(r#"{"direction": "up"}"#).unwrap();
        assert_eq!(up.direction, VoteDirection::Up);
        assert_eq!(up.direction.column(), "upvotes");

        let down: VoteRequestDto = serde_json::from_str(r#"{"direction": "down"}"#).unwrap();
        assert_eq!(down.direction.column(), "downvotes");

        assert!(serde_json::from_str::<VoteRequestDto>(r#"{"direction": "sideways"}"#).is_err());
    }
}
