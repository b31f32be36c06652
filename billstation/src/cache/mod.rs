//! Ephemeral reset-token cache.
//!
//! The cache stores single-use password-reset tokens keyed by token
//! value, with TTL-based expiry. The one non-negotiable property is the
//! atomic consume: a token can be observed by at most one caller, ever.
//! Expiry is owned by the cache itself; the auth core never tracks it.

use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{AuthResult, UserId};

pub mod memory;
pub mod pg;

pub use memory::MemoryTokenCache;
pub use pg::PgTokenCache;

/// Ephemeral token cache contract
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Store a token with its user payload and TTL.
    ///
    /// Token values carry enough entropy that collisions do not occur;
    /// overwriting is not part of the contract.
    async fn put(&self, token: &str, user_id: UserId, ttl: Duration) -> AuthResult<()>;

    /// Atomically fetch and delete a token.
    ///
    /// Returns `None` for tokens that never existed, expired, or were
    /// already consumed. Two concurrent consumers of the same token
    /// cannot both observe the payload.
    async fn consume(&self, token: &str) -> AuthResult<Option<UserId>>;
}
