//! HTTP API for the authentication server.
//!
//! A thin axum surface over [`billstation::auth::AuthService`]. Handlers
//! parse and validate the request shape, call into the auth core, and
//! serialize the structured result; everything with real behavior lives
//! in the library crate.
//!
//! # Endpoints
//!
//! ```text
//! GET  /health                  - Health check (public)
//! POST /auth/register           - Register and authenticate (public)
//! POST /auth/login              - Login (public)
//! POST /auth/forgot-password    - Begin password reset (public)
//! POST /auth/reset-password     - Complete password reset (public)
//! POST /auth/refresh            - Rotate a session pair (public)
//! GET  /auth/profile            - Profile of the bearer (auth required)
//! ```

pub mod auth;
pub mod middleware;
pub mod request_id;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use billstation::auth::AuthService;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Application state shared across all HTTP handlers.
///
/// Cloned per request; the service is behind an `Arc` so the clone is
/// cheap.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
}

/// Create the complete API router with all endpoints and middleware
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/auth/refresh", post(auth::refresh));

    let protected_routes = Router::new()
        .route("/auth/profile", get(auth::profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Probes the credential store; returns `503 Service Unavailable` when
/// it cannot be reached.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = state.auth.health_check().await.is_ok();

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": store_healthy,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
