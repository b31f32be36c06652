//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use billstation::auth::PasswordPolicy;
use billstation::db::DatabaseConfig;
use std::net::SocketAddr;
use std::time::Duration;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Session and reset-token lifetimes
    pub tokens: TokenConfig,
    /// Password-strength policy
    pub password_policy: PasswordPolicy,
    /// Include raw reset tokens in forgot-password responses (dev only)
    pub expose_reset_tokens: bool,
}

/// Security-related configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// JWT signing secret (required)
    pub jwt_secret: String,
    /// Password hashing pepper (required)
    pub password_pepper: String,
}

/// Token lifetime configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Access-token lifetime in seconds
    pub access_ttl_secs: u64,
    /// Refresh-token lifetime in seconds
    pub refresh_ttl_secs: u64,
    /// Reset-token TTL in seconds
    pub reset_ttl_secs: u64,
}

impl TokenConfig {
    pub fn reset_ttl(&self) -> Duration {
        Duration::from_secs(self.reset_ttl_secs)
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        database_url_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        // Bind address
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:8000"
                    .parse()
                    .expect("Default bind address is valid")
            });

        // Database configuration
        let database_url = database_url_override
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| "postgres://postgres@localhost/billstation_db".to_string());

        let database = DatabaseConfig {
            database_url,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 5),
            connection_timeout_secs: parse_env_or("DB_CONNECTION_TIMEOUT_SECS", 5),
            idle_timeout_secs: parse_env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: parse_env_or("DB_MAX_LIFETIME_SECS", 1800),
        };

        // Security configuration (REQUIRED)
        let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingRequired {
            var: "JWT_SECRET".to_string(),
            hint: "Generate with: openssl rand -hex 32".to_string(),
        })?;

        let password_pepper =
            std::env::var("PASSWORD_PEPPER").map_err(|_| ConfigError::MissingRequired {
                var: "PASSWORD_PEPPER".to_string(),
                hint: "Generate with: openssl rand -hex 16".to_string(),
            })?;

        if jwt_secret.len() < 32 {
            return Err(ConfigError::Invalid {
                var: "JWT_SECRET".to_string(),
                reason: "Must be at least 32 characters (128-bit security)".to_string(),
            });
        }

        if password_pepper.len() < 16 {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: "Must be at least 16 characters (64-bit security)".to_string(),
            });
        }

        let security = SecurityConfig {
            jwt_secret,
            password_pepper,
        };

        let tokens = TokenConfig {
            access_ttl_secs: parse_env_or("ACCESS_TOKEN_TTL_SECS", 900),
            refresh_ttl_secs: parse_env_or("REFRESH_TOKEN_TTL_SECS", 604_800),
            reset_ttl_secs: parse_env_or("RESET_TOKEN_TTL_SECS", 600),
        };

        let password_policy = PasswordPolicy {
            min_length: parse_env_or("PASSWORD_MIN_LENGTH", 8),
            require_digit: parse_env_or("PASSWORD_REQUIRE_DIGIT", true),
            require_uppercase: parse_env_or("PASSWORD_REQUIRE_UPPERCASE", true),
            require_lowercase: parse_env_or("PASSWORD_REQUIRE_LOWERCASE", true),
        };

        let expose_reset_tokens = parse_env_or("EXPOSE_RESET_TOKENS", false);

        Ok(ServerConfig {
            bind,
            database,
            security,
            tokens,
            password_policy,
            expose_reset_tokens,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.access_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "ACCESS_TOKEN_TTL_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        // Access tokens must live much shorter than refresh tokens.
        if self.tokens.refresh_ttl_secs <= self.tokens.access_ttl_secs {
            return Err(ConfigError::Invalid {
                var: "REFRESH_TOKEN_TTL_SECS".to_string(),
                reason: format!(
                    "Must be greater than access-token TTL ({})",
                    self.tokens.access_ttl_secs
                ),
            });
        }

        if self.tokens.reset_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "RESET_TOKEN_TTL_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.password_policy.min_length < 8 {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_MIN_LENGTH".to_string(),
                reason: "Must be at least 8".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
