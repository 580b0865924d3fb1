use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::activity::{ActivityEntry, ActivityService};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, RegisterRequestDto, RegisterResponseDto,
    ResendPinRequestDto, UserDto, VerifyPinRequestDto,
};
use crate::features::auth::emails::send_pin;
use crate::features::auth::jwt::JwtService;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::models::User;
use crate::features::auth::password::{hash_password, verify_password};
use crate::features::auth::pin::{generate_pin, validate_pin};
use crate::modules::mail::MailSender;
use crate::shared::constants::{
    ACTION_LOGIN, ACTION_REGISTER, ACTION_VERIFY_EMAIL, ENTITY_USER, PIN_TTL_MINUTES,
};

const USER_COLUMNS: &str = "id, email, password_hash, name, is_verified, verification_pin, \
                            pin_created_at, created_at";

/// Registration, email verification and login
pub struct AuthService {
    pool: PgPool,
    jwt: Arc<JwtService>,
    mailer: Arc<dyn MailSender>,
    activity: Arc<ActivityService>,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        jwt: Arc<JwtService>,
        mailer: Arc<dyn MailSender>,
        activity: Arc<ActivityService>,
    ) -> Self {
        Self {
            pool,
            jwt,
            mailer,
            activity,
        }
    }

    /// Create an unverified account and email its PIN
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<RegisterResponseDto> {
        let email = normalize_email(&dto.email);
        let password = dto.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;

        let pin = generate_pin();

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, name, verification_pin, pin_created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&email)
        .bind(&password_hash)
        .bind(dto.name.trim())
        .bind(&pin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_db(e, "Email already registered"))?;

        tracing::info!("Registered user {} ({})", user.id, user.email);

        send_pin(self.mailer.as_ref(), &user.email, &user.name, &pin).await?;

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_REGISTER).entity(ENTITY_USER, user.id))
            .await;

        Ok(RegisterResponseDto {
            user: user.into(),
            pin_expires_in_minutes: PIN_TTL_MINUTES,
        })
    }

    /// Issue a fresh PIN to an account that is still unverified
    pub async fn resend_pin(&self, dto: ResendPinRequestDto) -> Result<()> {
        let user = self
            .find_by_email(&normalize_email(&dto.email))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_verified {
            return Err(AppError::BadRequest("Email already verified".to_string()));
        }

        let pin = generate_pin();
        sqlx::query(
            r#"
            UPDATE users
            SET verification_pin = $2, pin_created_at = NOW(), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&pin)
        .execute(&self.pool)
        .await?;

        send_pin(self.mailer.as_ref(), &user.email, &user.name, &pin).await?;

        tracing::info!("Re-sent verification PIN to user {}", user.id);
        Ok(())
    }

    /// Verify the emailed PIN and open a session
    pub async fn verify_pin(&self, dto: VerifyPinRequestDto) -> Result<AuthResponseDto> {
        let user = self
            .find_by_email(&normalize_email(&dto.email))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_verified {
            return Err(AppError::BadRequest("Email already verified".to_string()));
        }

        validate_pin(
            user.verification_pin.as_deref(),
            user.pin_created_at,
            &dto.pin,
            Utc::now(),
        )?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_verified = TRUE, verification_pin = NULL, pin_created_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("User {} verified email", user.id);

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_VERIFY_EMAIL).entity(ENTITY_USER, user.id))
            .await;

        self.session_for(user)
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .find_by_email(&normalize_email(&dto.email))
            .await?
            .ok_or_else(invalid)?;

        let password = dto.password;
        let stored_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    AppError::Internal(format!("Password verification task failed: {}", e))
                })??;

        if !matches {
            return Err(invalid());
        }

        if !user.is_verified {
            return Err(AppError::Forbidden("Email not verified".to_string()));
        }

        self.activity
            .record(ActivityEntry::new(user.id, ACTION_LOGIN).entity(ENTITY_USER, user.id))
            .await;

        self.session_for(user)
    }

    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<UserDto> {
        self.find_by_id(user.id)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub fn session_max_age_secs(&self) -> i64 {
        self.jwt.expiry_secs()
    }

    fn session_for(&self, user: User) -> Result<AuthResponseDto> {
        let access_token = self.jwt.issue(user.id, &user.email)?;

        Ok(AuthResponseDto {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.expiry_secs(),
            user: user.into(),
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Emails are stored and compared trimmed and lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::search::SearchLimits;
    use crate::shared::test_helpers::RecordingMailer;
    use chrono::DateTime;
    use std::time::Duration;

    type PinState = (bool, Option<String>, Option<DateTime<Utc>>);

    fn service(pool: &PgPool, mailer: Arc<RecordingMailer>) -> AuthService {
        let jwt = Arc::new(JwtService::new(
            "auth-service-test-secret-0123456789",
            Duration::from_secs(600),
        ));
        let activity = Arc::new(ActivityService::new(pool.clone(), SearchLimits::new(50, 500)));
        AuthService::new(pool.clone(), jwt, mailer, activity)
    }

    fn registration(email: &str) -> RegisterRequestDto {
        RegisterRequestDto {
            email: email.to_string(),
            password: "hangar-door-42".to_string(),
            name: "Dewi Lestari".to_string(),
        }
    }

    async fn pin_state(pool: &PgPool, email: &str) -> PinState {
        sqlx::query_as(
            "SELECT is_verified, verification_pin, pin_created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn age_pin(pool: &PgPool, email: &str, minutes: i32) {
        sqlx::query(
            "UPDATE users SET pin_created_at = NOW() - make_interval(mins => $2) WHERE email = $1",
        )
        .bind(email)
        .bind(minutes)
        .execute(pool)
        .await
        .unwrap();
    }

    fn verify(email: &str, pin: &str) -> VerifyPinRequestDto {
        VerifyPinRequestDto {
            email: email.to_string(),
            pin: pin.to_string(),
        }
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Tech.Lead@Example.COM "), "tech.lead@example.com");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_stores_pin_and_mails_it(pool: PgPool) {
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(&pool, Arc::clone(&mailer));

        let response = service.register(registration(" Dewi@Example.com ")).await.unwrap();

        assert_eq!(response.user.email, "dewi@example.com");
        assert!(!response.user.is_verified);
        let (verified, pin, created_at) = pin_state(&pool, "dewi@example.com").await;
        assert!(!verified);
        assert!(created_at.is_some());
        let pin = pin.unwrap();
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "dewi@example.com");
        assert!(sent[0].text.contains(&pin));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_duplicate_email_conflicts(pool: PgPool) {
        let service = service(&pool, Arc::new(RecordingMailer::default()));
        service.register(registration("dewi@example.com")).await.unwrap();

        let result = service.register(registration("DEWI@example.com")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_verify_pin_clears_pin_and_marks_verified(pool: PgPool) {
        let service = service(&pool, Arc::new(RecordingMailer::default()));
        service.register(registration("dewi@example.com")).await.unwrap();
        let (_, pin, _) = pin_state(&pool, "dewi@example.com").await;

        let session = service
            .verify_pin(verify("dewi@example.com", &pin.unwrap()))
            .await
            .unwrap();

        assert!(session.user.is_verified);
        assert_eq!(session.token_type, "Bearer");
        assert_eq!(pin_state(&pool, "dewi@example.com").await, (true, None, None));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_verify_pin_on_verified_account_is_rejected(pool: PgPool) {
        let service = service(&pool, Arc::new(RecordingMailer::default()));
        service.register(registration("dewi@example.com")).await.unwrap();
        let (_, pin, _) = pin_state(&pool, "dewi@example.com").await;
        let pin = pin.unwrap();
        service.verify_pin(verify("dewi@example.com", &pin)).await.unwrap();

        let result = service.verify_pin(verify("dewi@example.com", &pin)).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_verify_pin_failures_keep_account_unverified(pool: PgPool) {
        let service = service(&pool, Arc::new(RecordingMailer::default()));
        service.register(registration("dewi@example.com")).await.unwrap();
        let (_, pin, _) = pin_state(&pool, "dewi@example.com").await;
        let pin = pin.unwrap();
        let wrong = if pin == "000000" { "111111" } else { "000000" };

        let invalid = service.verify_pin(verify("dewi@example.com", wrong)).await;
        assert!(matches!(invalid, Err(AppError::BadRequest(ref m)) if m == "Invalid PIN"));

        age_pin(&pool, "dewi@example.com", 6).await;
        let expired = service.verify_pin(verify("dewi@example.com", &pin)).await;
        assert!(matches!(expired, Err(AppError::BadRequest(ref m)) if m == "PIN expired"));

        let (verified, stored, created_at) = pin_state(&pool, "dewi@example.com").await;
        assert!(!verified);
        assert_eq!(stored, Some(pin));
        assert!(created_at.is_some());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resend_pin_replaces_pin_and_restarts_window(pool: PgPool) {
        let mailer = Arc::new(RecordingMailer::default());
        let service = service(&pool, Arc::clone(&mailer));
        service.register(registration("dewi@example.com")).await.unwrap();
        age_pin(&pool, "dewi@example.com", 10).await;
        let (_, _, aged_at) = pin_state(&pool, "dewi@example.com").await;

        service
            .resend_pin(ResendPinRequestDto {
                email: "dewi@example.com".to_string(),
            })
            .await
            .unwrap();

        let (_, pin, created_at) = pin_state(&pool, "dewi@example.com").await;
        let pin = pin.unwrap();
        assert!(created_at.unwrap() > aged_at.unwrap());
        {
            let sent = mailer.sent.lock().unwrap();
            assert_eq!(sent.len(), 2);
            assert!(sent[1].text.contains(&pin));
        }

        let session = service.verify_pin(verify("dewi@example.com", &pin)).await;
        assert!(session.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_resend_pin_for_verified_or_unknown_account(pool: PgPool) {
        let service = service(&pool, Arc::new(RecordingMailer::default()));
        service.register(registration("dewi@example.com")).await.unwrap();
        let (_, pin, _) = pin_state(&pool, "dewi@example.com").await;
        service
            .verify_pin(verify("dewi@example.com", &pin.unwrap()))
            .await
            .unwrap();

        let verified = service
            .resend_pin(ResendPinRequestDto {
                email: "dewi@example.com".to_string(),
            })
            .await;
        let unknown = service
            .resend_pin(ResendPinRequestDto {
                email: "nobody@example.com".to_string(),
            })
            .await;

        assert!(matches!(verified, Err(AppError::BadRequest(_))));
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_login_requires_verified_email(pool: PgPool) {
        let service = service(&pool, Arc::new(RecordingMailer::default()));
        service.register(registration("dewi@example.com")).await.unwrap();

        let unverified = service
            .login(LoginRequestDto {
                email: "dewi@example.com".to_string(),
                password: "hangar-door-42".to_string(),
            })
            .await;
        let wrong_password = service
            .login(LoginRequestDto {
                email: "dewi@example.com".to_string(),
                password: "hangar-door-43".to_string(),
            })
            .await;

        assert!(matches!(unverified, Err(AppError::Forbidden(_))));
        assert!(matches!(wrong_password, Err(AppError::Unauthorized(_))));
    }
}
