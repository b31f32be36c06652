//! Structured logging configuration.
//!
//! Initializes a `tracing` subscriber for the server; `log` records from
//! the billstation library are picked up through the subscriber's
//! log-compatibility layer.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging.
///
/// Log levels are configurable via `RUST_LOG`; sqlx and hyper chatter is
/// kept at `warn` by default.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Log a security-relevant event with structured fields.
///
/// Never pass secrets (passwords, token values) in `message`; callers
/// identify subjects by user ID only.
pub fn log_security_event(event_type: &str, user_id: Option<i64>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        user_id = user_id,
        "SECURITY: {}",
        message
    );
}
