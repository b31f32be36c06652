//! Authentication backend server.
//!
//! Wires the Postgres-backed collaborators into the auth core and
//! exposes it over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use billstation::auth::AuthService;
use billstation::cache::PgTokenCache;
use billstation::db::{Database, PgUserStore};
use billstation::password::Argon2Hasher;
use billstation::session::SessionIssuer;
use chrono::Duration;
use ctrlc::set_handler;
use pico_args::Arguments;
use tracing::info;

use bs_server::api;
use bs_server::config::ServerConfig;
use bs_server::logging;

const HELP: &str = "\
Run the billstation authentication server

USAGE:
  bs_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/billstation_db]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8000)
  DATABASE_URL             PostgreSQL connection string
  JWT_SECRET               JWT signing secret (required)
  PASSWORD_PEPPER          Password hashing pepper (required)
  EXPOSE_RESET_TOKENS      Include raw reset tokens in responses (dev only)
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let db_url_override: Option<String> = pargs.opt_value_from_str("--db-url")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, db_url_override)?;
    config.validate()?;

    info!("Starting authentication server at {}", config.bind);

    let db = Database::new(&config.database)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    db.ensure_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to prepare schema: {}", e))?;

    info!("Database connected successfully");

    let pool = Arc::new(db.pool().clone());

    let sessions = SessionIssuer::with_durations(
        config.security.jwt_secret.clone(),
        Duration::seconds(config.tokens.access_ttl_secs as i64),
        Duration::seconds(config.tokens.refresh_ttl_secs as i64),
    );

    let auth = AuthService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(PgTokenCache::new(pool.clone())),
        Arc::new(Argon2Hasher::new(config.security.password_pepper.clone())),
        sessions,
    )
    .with_policy(config.password_policy.clone())
    .with_reset_token_ttl(config.tokens.reset_ttl())
    .with_revealed_reset_tokens(config.expose_reset_tokens);

    if config.expose_reset_tokens {
        tracing::warn!("EXPOSE_RESET_TOKENS is enabled; do not run this way in production");
    }

    let state = api::AppState {
        auth: Arc::new(auth),
    };
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
