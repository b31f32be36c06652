//! Authentication API handlers.
//!
//! REST endpoints for registration, login, the password-reset flow,
//! token refresh, and profile retrieval. All endpoints speak JSON and
//! map the core's error taxonomy onto HTTP status codes:
//!
//! | Error                     | Status |
//! |---------------------------|--------|
//! | `ValidationFailed`        | 400    |
//! | `InvalidOrExpiredToken`   | 400    |
//! | `InvalidCredentials`      | 401    |
//! | `InvalidSession`          | 401    |
//! | `DuplicateEmail`          | 409    |
//! | `CollaboratorUnavailable` | 503    |
//! | anything internal        | 500    |

use axum::{Extension, extract::State, http::StatusCode, response::Json};
use billstation::auth::{
    AuthError, AuthenticatedUser, ForgotPasswordReceipt, LoginRequest, RegisterRequest,
    ResetPasswordRequest, UserId, UserProfile,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::logging::log_security_event;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordPayload {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordPayload {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshPayload {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a core error onto its HTTP representation, using the sanitized
/// client message so internals never leak through the boundary.
fn error_response(err: &AuthError) -> ApiError {
    let status = match err {
        AuthError::ValidationFailed(_) | AuthError::InvalidOrExpiredToken => {
            StatusCode::BAD_REQUEST
        }
        AuthError::InvalidCredentials | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
        AuthError::DuplicateEmail => StatusCode::CONFLICT,
        AuthError::CollaboratorUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorResponse {
            error: err.client_message(),
        }),
    )
}

/// Register a new user account and immediately authenticate it.
///
/// Returns `201 Created` with the new profile and a session pair, `400`
/// for validation failures, `409` when the email is taken.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<AuthenticatedUser>), ApiError> {
    let request = RegisterRequest {
        email: payload.email,
        full_name: payload.full_name,
        password: payload.password,
        password_confirm: payload.password_confirm,
    };

    match state.auth.register(request).await {
        Ok(authed) => Ok((StatusCode::CREATED, Json(authed))),
        Err(e) => Err(error_response(&e)),
    }
}

/// Authenticate with email and password.
///
/// Returns `200 OK` with a session pair, or `401` with one generic
/// message for every failure mode.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthenticatedUser>, ApiError> {
    let request = LoginRequest {
        email: payload.email,
        password: payload.password,
    };

    match state.auth.login(request).await {
        Ok(authed) => Ok(Json(authed)),
        Err(e) => {
            if matches!(e, AuthError::InvalidCredentials) {
                log_security_event("failed_login", None, "Login rejected");
            }
            Err(error_response(&e))
        }
    }
}

/// Begin the password-reset flow.
///
/// Always returns `200 OK` with the same response shape; whether the
/// email is registered is not observable from the outside. The raw
/// token appears in the body only when the server runs with
/// `EXPOSE_RESET_TOKENS` enabled.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<ForgotPasswordReceipt>, ApiError> {
    match state.auth.forgot_password(&payload.email).await {
        Ok(receipt) => Ok(Json(receipt)),
        Err(e) => Err(error_response(&e)),
    }
}

/// Complete the password-reset flow with a token from forgot-password.
///
/// Returns `200 OK` on success, `400` for an invalid/expired token or a
/// rejected new password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let request = ResetPasswordRequest {
        token: payload.token,
        new_password: payload.new_password,
        confirm_password: payload.confirm_password,
    };

    match state.auth.reset_password(request).await {
        Ok(()) => Ok(Json(MessageResponse {
            message: "Password reset successful".to_string(),
        })),
        Err(e) => {
            if matches!(e, AuthError::InvalidOrExpiredToken) {
                log_security_event("invalid_reset_token", None, "Reset token rejected");
            }
            Err(error_response(&e))
        }
    }
}

/// Exchange a refresh token for a rotated session pair.
///
/// Returns `200 OK` with the new pair, `401` for anything invalid.
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<AuthenticatedUser>, ApiError> {
    match state.auth.refresh(&payload.refresh_token).await {
        Ok(tokens) => {
            // Resolve the rotated pair back to its owner for the response.
            match state.auth.profile(&tokens.access_token).await {
                Ok(user) => Ok(Json(AuthenticatedUser { user, tokens })),
                Err(e) => Err(error_response(&e)),
            }
        }
        Err(e) => Err(error_response(&e)),
    }
}

/// Profile of the authenticated bearer.
///
/// The auth middleware has already verified the access token and stashed
/// the user ID in request extensions.
pub async fn profile(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Json<UserProfile>, ApiError> {
    match state.auth.profile_by_id(user_id).await {
        Ok(profile) => Ok(Json(profile)),
        Err(e) => Err(error_response(&e)),
    }
}
