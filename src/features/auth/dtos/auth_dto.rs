use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::auth::models::User;
use crate::shared::validation::PIN_REGEX;

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Request DTO for re-sending the verification PIN
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct ResendPinRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Request DTO for verifying an email with its PIN
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct VerifyPinRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(regex(path = *PIN_REGEX, message = "PIN must be 6 digits"))]
    pub pin: String,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            is_verified: user.is_verified,
            created_at: user.created_at,
        }
    }
}

/// Response DTO for a freshly registered, still unverified account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponseDto {
    pub user: UserDto,
    /// Minutes until the emailed PIN expires
    pub pin_expires_in_minutes: i64,
}

/// Response DTO for an established session (verify-pin / login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    /// Session JWT, also set as an HttpOnly cookie
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    pub user: UserDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_pin_dto_rejects_malformed_pin() {
        let dto = VerifyPinRequestDto {
            email: "tech@example.com".to_string(),
            pin: "12ab56".to_string(),
        };
        assert!(dto.validate().is_err());

        let dto = VerifyPinRequestDto {
            email: "tech@example.com".to_string(),
            pin: "012345".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_dto_requires_long_password() {
        let dto = RegisterRequestDto {
            email: "tech@example.com".to_string(),
            password: "short".to_string(),
            name: "Tech".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
