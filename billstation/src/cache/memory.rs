//! In-memory token cache for tests and database-free development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::TokenCache;
use crate::auth::{AuthResult, UserId};

/// Mutex-guarded map with per-entry deadlines.
///
/// The deadline check happens inside the same critical section as the
/// removal, so an expired entry is never handed out and a token is never
/// consumed twice, even under concurrent access.
#[derive(Default)]
pub struct MemoryTokenCache {
    entries: Mutex<HashMap<String, (UserId, Instant)>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries, for test assertions
    pub fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|(_, deadline)| *deadline > now)
            .count()
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn put(&self, token: &str, user_id: UserId, ttl: Duration) -> AuthResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();

        // Opportunistic sweep; the map stays bounded without a reaper task.
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.insert(token.to_string(), (user_id, now + ttl));
        Ok(())
    }

    async fn consume(&self, token: &str) -> AuthResult<Option<UserId>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.remove(token) {
            Some((user_id, deadline)) if deadline > Instant::now() => Ok(Some(user_id)),
            _ => Ok(None),
        }
    }
}
