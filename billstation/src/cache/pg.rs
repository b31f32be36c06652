//! Postgres-backed token cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};

use super::TokenCache;
use crate::auth::{AuthError, AuthResult, UserId};
use crate::db::timeouts::with_default_timeout;

/// Token cache on top of the `password_reset_tokens` table.
///
/// Consume is a single `DELETE ... RETURNING` statement, so two
/// concurrent redemptions of the same token resolve inside the database:
/// at most one of them gets a row back. Expired rows are excluded by the
/// `expires_at` predicate and swept opportunistically on `put`.
#[derive(Clone)]
pub struct PgTokenCache {
    pool: Arc<PgPool>,
}

impl PgTokenCache {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenCache for PgTokenCache {
    async fn put(&self, token: &str, user_id: UserId, ttl: Duration) -> AuthResult<()> {
        let expires_at = Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|_| AuthError::ValidationFailed("TTL out of range".to_string()))?;

        with_default_timeout(
            sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at <= NOW()")
                .execute(self.pool.as_ref()),
        )
        .await?;

        with_default_timeout(
            sqlx::query(
                "INSERT INTO password_reset_tokens (token, user_id, expires_at)
                 VALUES ($1, $2, $3)",
            )
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn consume(&self, token: &str) -> AuthResult<Option<UserId>> {
        let row = with_default_timeout(
            sqlx::query(
                "DELETE FROM password_reset_tokens
                 WHERE token = $1 AND expires_at > NOW()
                 RETURNING user_id",
            )
            .bind(token)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(|r| r.get("user_id")))
    }
}
