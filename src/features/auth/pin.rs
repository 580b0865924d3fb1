//! Email verification PINs
//!
//! A PIN is a fixed-length numeric string stored next to the time it was
//! issued. It stays valid for [`PIN_TTL_MINUTES`] after issue.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use thiserror::Error;

use crate::core::error::AppError;
use crate::shared::constants::{PIN_LENGTH, PIN_TTL_MINUTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PinError {
    #[error("PIN not generated")]
    NotGenerated,

    #[error("PIN expired")]
    Expired,

    #[error("Invalid PIN")]
    Invalid,
}

impl From<PinError> for AppError {
    fn from(e: PinError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

/// Generate a random numeric PIN. Leading zeros are kept.
pub fn generate_pin() -> String {
    let mut rng = rand::rng();
    (0..PIN_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Check `input` against the stored PIN as of `now`
pub fn validate_pin(
    stored_pin: Option<&str>,
    created_at: Option<DateTime<Utc>>,
    input: &str,
    now: DateTime<Utc>,
) -> Result<(), PinError> {
    let (Some(stored_pin), Some(created_at)) = (stored_pin, created_at) else {
        return Err(PinError::NotGenerated);
    };

    if now > created_at + Duration::minutes(PIN_TTL_MINUTES) {
        return Err(PinError::Expired);
    }

    if input != stored_pin {
        return Err(PinError::Invalid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::PIN_REGEX;

    fn issued_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_generate_pin_shape() {
        for _ in 0..200 {
            let pin = generate_pin();
            assert_eq!(pin.len(), PIN_LENGTH);
            assert!(PIN_REGEX.is_match(&pin), "bad pin {}", pin);
        }
    }

    #[test]
    fn test_validate_pin_accepts_match_within_ttl() {
        let now = issued_at() + Duration::minutes(4);
        assert_eq!(
            validate_pin(Some("042917"), Some(issued_at()), "042917", now),
            Ok(())
        );
    }

    #[test]
    fn test_validate_pin_boundary_is_inclusive() {
        let now = issued_at() + Duration::minutes(PIN_TTL_MINUTES);
        assert!(validate_pin(Some("111111"), Some(issued_at()), "111111", now).is_ok());
    }

    #[test]
    fn test_validate_pin_expired() {
        let now = issued_at() + Duration::minutes(PIN_TTL_MINUTES) + Duration::seconds(1);
        assert_eq!(
            validate_pin(Some("111111"), Some(issued_at()), "111111", now),
            Err(PinError::Expired)
        );
    }

    #[test]
    fn test_validate_pin_expiry_checked_before_mismatch() {
        let now = issued_at() + Duration::minutes(30);
        assert_eq!(
            validate_pin(Some("111111"), Some(issued_at()), "222222", now),
            Err(PinError::Expired)
        );
    }

    #[test]
    fn test_validate_pin_mismatch() {
        let now = issued_at() + Duration::minutes(1);
        assert_eq!(
            validate_pin(Some("111111"), Some(issued_at()), "111112", now),
            Err(PinError::Invalid)
        );
    }

    #[test]
    fn test_validate_pin_not_generated() {
        let now = issued_at();
        assert_eq!(
            validate_pin(None, Some(issued_at()), "111111", now),
            Err(PinError::NotGenerated)
        );
        assert_eq!(
            validate_pin(Some("111111"), None, "111111", now),
            Err(PinError::NotGenerated)
        );
    }

    #[test]
    fn test_pin_error_maps_to_bad_request() {
        let err: AppError = PinError::Expired.into();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Bad request: PIN expired");
    }
}
