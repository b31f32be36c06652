//! Credential-store contract and its Postgres implementation.
//!
//! The trait exists for dependency injection: the auth core is handed a
//! `UserStore` and never knows which engine sits behind it. The Postgres
//! implementation lives here; an in-memory one for tests and DB-free
//! development lives in [`crate::db::memory`].

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::sync::Arc;

use crate::auth::{AuthError, AuthResult, User, UserId};
use crate::db::timeouts::with_default_timeout;

/// Trait for credential-store operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user with a pre-normalized email.
    ///
    /// The insert is atomic with respect to email uniqueness: when two
    /// registrations race on the same email, exactly one succeeds and
    /// the other fails with [`AuthError::DuplicateEmail`].
    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> AuthResult<User>;

    /// Find a user by pre-normalized email
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Atomically overwrite a user's password hash
    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AuthResult<()>;

    /// Cheap reachability probe for health checks
    async fn ping(&self) -> AuthResult<()>;
}

/// PostgreSQL implementation of [`UserStore`]
#[derive(Clone)]
pub struct PgUserStore {
    pool: Arc<PgPool>,
}

impl PgUserStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    }
}

const USER_COLUMNS: &str = "id, email, full_name, password_hash, is_active, created_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> AuthResult<User> {
        // Single INSERT; the UNIQUE constraint on email turns concurrent
        // duplicates into a database error mapped to DuplicateEmail.
        let row = with_default_timeout(
            sqlx::query(&format!(
                "INSERT INTO users (email, full_name, password_hash)
                 VALUES ($1, $2, $3)
                 RETURNING {USER_COLUMNS}"
            ))
            .bind(email)
            .bind(full_name)
            .bind(password_hash)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(user_from_row(&row))
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let row = with_default_timeout(
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = with_default_timeout(
            sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AuthResult<()> {
        let result = with_default_timeout(
            sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
                .bind(password_hash)
                .bind(user_id)
                .execute(self.pool.as_ref()),
        )
        .await?;

        if result.rows_affected() == 0 {
            // The token pointed at a user that no longer exists; keep the
            // response generic.
            return Err(AuthError::InvalidOrExpiredToken);
        }

        Ok(())
    }

    async fn ping(&self) -> AuthResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(self.pool.as_ref())).await?;
        Ok(())
    }
}
