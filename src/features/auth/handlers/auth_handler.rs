use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, RegisterRequestDto, RegisterResponseDto,
    ResendPinRequestDto, UserDto, VerifyPinRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::routes::AuthState;
use crate::shared::types::ApiResponse;

/// Register a new user and email a verification PIN
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered, PIN sent", body = ApiResponse<RegisterResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let registered = state.service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(registered),
            Some("Verification PIN sent".to_string()),
            None,
        )),
    ))
}

/// Send a new verification PIN
#[utoipa::path(
    post,
    path = "/api/auth/resend-pin",
    request_body = ResendPinRequestDto,
    responses(
        (status = 200, description = "PIN re-sent"),
        (status = 400, description = "Validation error or already verified"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
pub async fn resend_pin(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<ResendPinRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    state.service.resend_pin(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Verification PIN sent".to_string()),
        None,
    )))
}

/// Verify an email address with its PIN and start a session
#[utoipa::path(
    post,
    path = "/api/auth/verify-pin",
    request_body = VerifyPinRequestDto,
    responses(
        (status = 200, description = "Email verified, session cookie set", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "PIN not generated, expired or invalid"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
pub async fn verify_pin(
    State(state): State<AuthState>,
    jar: CookieJar,
    AppJson(dto): AppJson<VerifyPinRequestDto>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = state.service.verify_pin(dto).await?;
    let jar = jar.add(state.cookies.issue(session.access_token.clone()));
    Ok((jar, Json(ApiResponse::success(Some(session), None, None))))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<(CookieJar, Json<ApiResponse<AuthResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = state.service.login(dto).await?;
    let jar = jar.add(state.cookies.issue(session.access_token.clone()));
    Ok((jar, Json(ApiResponse::success(Some(session), None, None))))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(state): State<AuthState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiResponse<()>>) {
    (
        jar.add(state.cookies.clear()),
        Json(ApiResponse::success(
            None,
            Some("Logged out".to_string()),
            None,
        )),
    )
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<UserDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(state): State<AuthState>,
) -> Result<Json<ApiResponse<UserDto>>> {
    let user_data = state.service.get_current_user(&user).await?;
    Ok(Json(ApiResponse::success(Some(user_data), None, None)))
}
