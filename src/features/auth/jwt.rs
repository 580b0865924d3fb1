use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 session tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry: Duration,
}

impl JwtService {
    pub fn new(secret: &str, expiry: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expiry)
    }

    /// Token lifetime in seconds
    pub fn expiry_secs(&self) -> i64 {
        self.expiry.as_secs() as i64
    }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<String, AppError> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issue a token as if signed at `issued_at`
    pub fn issue_at(
        &self,
        user_id: Uuid,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let iat = issued_at.timestamp();
        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            iat,
            exp: iat + self.expiry_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Session token rejected: {}", e);
                AppError::Unauthorized("Invalid or expired session".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-000000";

    #[test]
    fn test_issue_then_verify() {
        let service = JwtService::new(SECRET, Duration::from_secs(3600));
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "tech@example.com").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "tech@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new(SECRET, Duration::from_secs(60));
        let token = service
            .issue_at(
                Uuid::new_v4(),
                "tech@example.com",
                Utc::now() - chrono::Duration::hours(2),
            )
            .unwrap();

        let err = service.verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = JwtService::new("another-secret-that-is-long-enough-11", Duration::from_secs(60));
        let verifier = JwtService::new(SECRET, Duration::from_secs(60));
        let token = issuer.issue(Uuid::new_v4(), "tech@example.com").unwrap();

        assert!(verifier.verify(&token).is_err());
        assert!(verifier.verify("not-a-token").is_err());
    }
}
