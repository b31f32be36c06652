//! In-memory credential store for tests and database-free development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::store::UserStore;
use crate::auth::{AuthError, AuthResult, User, UserId};

struct Inner {
    users: HashMap<UserId, User>,
    next_id: UserId,
}

/// Map-backed [`UserStore`] implementation.
///
/// The whole store sits behind one mutex, so create-if-absent is atomic
/// and duplicate-registration races behave exactly like the database's
/// unique constraint.
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Deactivate an account (an external concern in production; exposed
    /// here so tests can cover the inactive-login path)
    pub fn deactivate(&self, user_id: UserId) {
        if let Some(user) = self.inner.lock().unwrap().users.get_mut(&user_id) {
            user.is_active = false;
        }
    }

    /// Number of stored user records, for test assertions
    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(
        &self,
        email: &str,
        full_name: &str,
        password_hash: &str,
    ) -> AuthResult<User> {
        let mut inner = self.inner.lock().unwrap();

        // Uniqueness check and insert happen under the same lock.
        if inner.users.values().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail);
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let user = User {
            id,
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash: password_hash.to_string(),
            is_active: true,
            created_at: chrono::Utc::now(),
        };

        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        Ok(self.inner.lock().unwrap().users.get(&user_id).cloned())
    }

    async fn update_password_hash(&self, user_id: UserId, password_hash: &str) -> AuthResult<()> {
        let mut inner = self.inner.lock().unwrap();
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(())
            }
            None => Err(AuthError::InvalidOrExpiredToken),
        }
    }

    async fn ping(&self) -> AuthResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let store = MemoryUserStore::new();

        let user = store
            .create_user("a@x.com", "Ada", "hash123")
            .await
            .expect("create should succeed");
        assert_eq!(user.id, 1);
        assert!(user.is_active);

        let found = store.find_by_email("a@x.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);

        assert!(store.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.create_user("a@x.com", "Ada", "h1").await.unwrap();

        let err = store.create_user("a@x.com", "Bob", "h2").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_update_password_hash() {
        let store = MemoryUserStore::new();
        let user = store.create_user("a@x.com", "Ada", "old").await.unwrap();

        store.update_password_hash(user.id, "new").await.unwrap();
        let found = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.password_hash, "new");
    }

    #[tokio::test]
    async fn test_update_password_hash_unknown_user() {
        let store = MemoryUserStore::new();
        let err = store.update_password_hash(999, "new").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidOrExpiredToken));
    }
}
