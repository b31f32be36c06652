//! HTTP integration tests for the authentication API.
//!
//! The router is wired with the in-memory collaborators, so these tests
//! exercise the full request path without a database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use async_trait::async_trait;
use billstation::auth::{AuthError, AuthResult, AuthService, User, UserId};
use billstation::cache::MemoryTokenCache;
use billstation::db::{MemoryUserStore, UserStore};
use billstation::password::Argon2Hasher;
use billstation::session::SessionIssuer;
use bs_server::api::{AppState, create_router};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

fn test_router() -> Router {
    let auth = AuthService::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryTokenCache::new()),
        Arc::new(Argon2Hasher::new("test-pepper".to_string())),
        SessionIssuer::new(JWT_SECRET.to_string()),
    )
    .with_revealed_reset_tokens(true);

    create_router(AppState {
        auth: Arc::new(auth),
    })
}

/// Store whose every operation fails as unreachable, standing in for a
/// database that is down or wedged.
struct UnreachableStore;

#[async_trait]
impl UserStore for UnreachableStore {
    async fn create_user(&self, _: &str, _: &str, _: &str) -> AuthResult<User> {
        Err(AuthError::CollaboratorUnavailable(
            "credential store".to_string(),
        ))
    }

    async fn find_by_email(&self, _: &str) -> AuthResult<Option<User>> {
        Err(AuthError::CollaboratorUnavailable(
            "credential store".to_string(),
        ))
    }

    async fn find_by_id(&self, _: UserId) -> AuthResult<Option<User>> {
        Err(AuthError::CollaboratorUnavailable(
            "credential store".to_string(),
        ))
    }

    async fn update_password_hash(&self, _: UserId, _: &str) -> AuthResult<()> {
        Err(AuthError::CollaboratorUnavailable(
            "credential store".to_string(),
        ))
    }

    async fn ping(&self) -> AuthResult<()> {
        Err(AuthError::CollaboratorUnavailable(
            "credential store".to_string(),
        ))
    }
}

fn unreachable_store_router() -> Router {
    let auth = AuthService::new(
        Arc::new(UnreachableStore),
        Arc::new(MemoryTokenCache::new()),
        Arc::new(Argon2Hasher::new("test-pepper".to_string())),
        SessionIssuer::new(JWT_SECRET.to_string()),
    );

    create_router(AppState {
        auth: Arc::new(auth),
    })
}

async fn send_json(router: &Router, method: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get_with_bearer(router: &Router, path: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn register_body(email: &str) -> Value {
    json!({
        "email": email,
        "full_name": "Ada Lovelace",
        "password": "Sup3rSecret!",
        "password_confirm": "Sup3rSecret!",
    })
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);
}

#[tokio::test]
async fn test_register_returns_created_with_session() {
    let router = test_router();

    let (status, body) =
        send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["full_name"], "Ada Lovelace");
    assert!(body["tokens"]["access_token"].is_string());
    assert!(body["tokens"]["refresh_token"].is_string());
    // The hash must never appear in a response.
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let router = test_router();

    let (status, _) =
        send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;
    assert_eq!(status, StatusCode::CREATED);

    // Case and whitespace variants collide with the first registration.
    let (status, body) = send_json(
        &router,
        "POST",
        "/auth/register",
        register_body("  ADA@Example.COM "),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords() {
    let router = test_router();

    let (status, _) = send_json(
        &router,
        "POST",
        "/auth/register",
        json!({
            "email": "ada@example.com",
            "full_name": "Ada Lovelace",
            "password": "Sup3rSecret!",
            "password_confirm": "Different1!",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_roundtrip() {
    let router = test_router();
    send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;

    let (status, body) = send_json(
        &router,
        "POST",
        "/auth/login",
        json!({"email": "ada@example.com", "password": "Sup3rSecret!"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["tokens"]["access_token"].is_string());
}

#[tokio::test]
async fn test_login_failures_share_one_response() {
    let router = test_router();
    send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;

    let (wrong_pw_status, wrong_pw_body) = send_json(
        &router,
        "POST",
        "/auth/login",
        json!({"email": "ada@example.com", "password": "WrongPass1!"}),
    )
    .await;
    let (unknown_status, unknown_body) = send_json(
        &router,
        "POST",
        "/auth/login",
        json!({"email": "nobody@example.com", "password": "WrongPass1!"}),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn test_password_reset_roundtrip() {
    let router = test_router();
    send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;

    let (status, receipt) = send_json(
        &router,
        "POST",
        "/auth/forgot-password",
        json!({"email": "ada@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = receipt["reset_token"].as_str().unwrap().to_string();

    let (status, body) = send_json(
        &router,
        "POST",
        "/auth/reset-password",
        json!({
            "token": token,
            "new_password": "Fr3shSecret!",
            "confirm_password": "Fr3shSecret!",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset successful");

    // Old password is dead, the new one works.
    let (status, _) = send_json(
        &router,
        "POST",
        "/auth/login",
        json!({"email": "ada@example.com", "password": "Sup3rSecret!"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &router,
        "POST",
        "/auth/login",
        json!({"email": "ada@example.com", "password": "Fr3shSecret!"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_unknown_email_same_shape() {
    let router = test_router();

    let (status, receipt) = send_json(
        &router,
        "POST",
        "/auth/forgot-password",
        json!({"email": "nobody@example.com"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(receipt["expires_in_secs"].is_number());
    assert!(receipt.get("reset_token").is_none());
}

#[tokio::test]
async fn test_reset_password_rejects_unknown_token() {
    let router = test_router();

    let (status, _) = send_json(
        &router,
        "POST",
        "/auth/reset-password",
        json!({
            "token": "not-a-real-token",
            "new_password": "Fr3shSecret!",
            "confirm_password": "Fr3shSecret!",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_requires_bearer_token() {
    let router = test_router();
    let (_, registered) =
        send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;
    let access = registered["tokens"]["access_token"].as_str().unwrap();

    let (status, profile) = get_with_bearer(&router, "/auth/profile", access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ada@example.com");

    // Missing header.
    let request = Request::builder()
        .uri("/auth/profile")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token.
    let (status, _) = get_with_bearer(&router, "/auth/profile", "not.a.jwt").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_session() {
    let router = test_router();
    let (_, registered) =
        send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;
    let refresh = registered["tokens"]["refresh_token"].as_str().unwrap();

    let (status, rotated) = send_json(
        &router,
        "POST",
        "/auth/refresh",
        json!({"refresh_token": refresh}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let access = rotated["tokens"]["access_token"].as_str().unwrap();
    let (status, profile) = get_with_bearer(&router, "/auth/profile", access).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "ada@example.com");
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let router = test_router();
    let (_, registered) =
        send_json(&router, "POST", "/auth/register", register_body("ada@example.com")).await;
    let access = registered["tokens"]["access_token"].as_str().unwrap();

    let (status, _) = send_json(
        &router,
        "POST",
        "/auth/refresh",
        json!({"refresh_token": access}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let router = test_router();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));

    // A caller-supplied id is echoed back.
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn test_unreachable_store_maps_to_service_unavailable() {
    let router = unreachable_store_router();

    let (status, body) = send_json(
        &router,
        "POST",
        "/auth/login",
        json!({"email": "ada@example.com", "password": "Sup3rSecret!"}),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service temporarily unavailable");
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let router = unreachable_store_router();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["store"], false);
}
