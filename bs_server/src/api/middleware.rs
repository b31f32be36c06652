//! Authentication middleware for protected endpoints.
//!
//! Extracts the JWT access token from the `Authorization: Bearer <token>`
//! header, verifies it against the session issuer, and injects the
//! authenticated user ID into request extensions for downstream
//! handlers. Missing header, malformed header, and invalid token all
//! collapse to a bare `401 Unauthorized`.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::AppState;

/// Verify the bearer access token and inject the user ID.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = match auth_header {
        Some(t) => t,
        None => return Err(StatusCode::UNAUTHORIZED),
    };

    match state.auth.verify_access_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims.sub);
            Ok(next.run(request).await)
        }
        Err(_) => Err(StatusCode::UNAUTHORIZED),
    }
}
