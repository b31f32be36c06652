//! Auth core orchestrator.
//!
//! `AuthService` implements registration, login, forgot-password, and
//! reset-password as state transitions over four injected collaborators:
//! the credential store, the reset-token cache, the password hasher, and
//! the session issuer. The service itself holds no mutable state; all
//! racy operations are delegated to the store's unique constraint and
//! the cache's atomic consume.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use rand::{Rng, distr::Alphanumeric};

use super::errors::{AuthError, AuthResult};
use super::models::{
    AuthenticatedUser, ForgotPasswordReceipt, LoginRequest, RegisterRequest, ResetPasswordRequest,
    SessionTokens, UserId, UserProfile, normalize_email,
};
use super::policy::{PasswordPolicy, validate_email};
use crate::cache::TokenCache;
use crate::db::UserStore;
use crate::password::CredentialHasher;
use crate::session::{SessionClaims, SessionIssuer};

/// Reset tokens are 32 alphanumeric characters, roughly 190 bits of
/// entropy. Collisions and guessing are both out of reach at that size.
const RESET_TOKEN_LEN: usize = 32;

/// Default reset-token lifetime (10 minutes)
pub const DEFAULT_RESET_TOKEN_TTL: Duration = Duration::from_secs(600);

/// Authentication service
pub struct AuthService {
    store: Arc<dyn UserStore>,
    cache: Arc<dyn TokenCache>,
    hasher: Arc<dyn CredentialHasher>,
    sessions: SessionIssuer,
    policy: PasswordPolicy,
    reset_token_ttl: Duration,
    reveal_reset_tokens: bool,
}

impl AuthService {
    /// Create a service with the default password policy, a 10-minute
    /// reset-token TTL, and reset-token exposure disabled.
    pub fn new(
        store: Arc<dyn UserStore>,
        cache: Arc<dyn TokenCache>,
        hasher: Arc<dyn CredentialHasher>,
        sessions: SessionIssuer,
    ) -> Self {
        Self {
            store,
            cache,
            hasher,
            sessions,
            policy: PasswordPolicy::default(),
            reset_token_ttl: DEFAULT_RESET_TOKEN_TTL,
            reveal_reset_tokens: false,
        }
    }

    /// Replace the password-strength policy
    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the reset-token TTL
    pub fn with_reset_token_ttl(mut self, ttl: Duration) -> Self {
        self.reset_token_ttl = ttl;
        self
    }

    /// Include the raw reset token in forgot-password receipts.
    ///
    /// Development convenience only: production deployments deliver the
    /// token through a trusted out-of-band channel instead.
    pub fn with_revealed_reset_tokens(mut self, reveal: bool) -> Self {
        self.reveal_reset_tokens = reveal;
        self
    }

    /// Register a new user and immediately authenticate them.
    ///
    /// # Errors
    ///
    /// * [`AuthError::ValidationFailed`] - Malformed email, password
    ///   mismatch, or weak password
    /// * [`AuthError::DuplicateEmail`] - Email already registered
    pub async fn register(&self, request: RegisterRequest) -> AuthResult<AuthenticatedUser> {
        let email = normalize_email(&request.email);
        validate_email(&email)?;
        self.policy
            .validate_pair(&request.password, &request.password_confirm)?;

        let password_hash = self.hasher.hash(&request.password)?;

        // Atomic unique insert; a concurrent duplicate registration loses
        // inside the store, not here.
        let user = self
            .store
            .create_user(&email, request.full_name.trim(), &password_hash)
            .await?;

        let tokens = self.sessions.issue(user.id, &user.email)?;
        info!("registered user {}", user.id);

        Ok(AuthenticatedUser {
            user: user.profile(),
            tokens,
        })
    }

    /// Authenticate with email and password.
    ///
    /// Unknown email, deactivated account, and wrong password are all
    /// reported as the same [`AuthError::InvalidCredentials`] so the
    /// response cannot be used to enumerate accounts.
    pub async fn login(&self, request: LoginRequest) -> AuthResult<AuthenticatedUser> {
        let email = normalize_email(&request.email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            warn!("login failed: unknown account");
            return Err(AuthError::InvalidCredentials);
        };

        if !user.is_active || !self.hasher.verify(&request.password, &user.password_hash) {
            warn!("login failed for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.sessions.issue(user.id, &user.email)?;
        info!("user {} logged in", user.id);

        Ok(AuthenticatedUser {
            user: user.profile(),
            tokens,
        })
    }

    /// Begin the password-reset flow.
    ///
    /// For a known, active account this generates a high-entropy token
    /// and caches it for the configured TTL. For an unknown email it
    /// performs no cache write but still returns the same success-shaped
    /// receipt, so the response cannot be used to enumerate accounts.
    pub async fn forgot_password(&self, email: &str) -> AuthResult<ForgotPasswordReceipt> {
        let email = normalize_email(email);
        validate_email(&email)?;

        let mut reset_token = None;
        if let Some(user) = self.store.find_by_email(&email).await?
            && user.is_active
        {
            let token = generate_reset_token();
            self.cache
                .put(&token, user.id, self.reset_token_ttl)
                .await?;
            info!("issued reset token for user {}", user.id);

            if self.reveal_reset_tokens {
                reset_token = Some(token);
            }
        }

        Ok(ForgotPasswordReceipt {
            reset_token,
            expires_in_secs: self.reset_token_ttl.as_secs(),
        })
    }

    /// Complete the password-reset flow.
    ///
    /// The token is consumed atomically *before* the new password is
    /// validated, so it burns even when validation or the subsequent
    /// write fails. A burned token can never be replayed; the caller
    /// restarts the flow.
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> AuthResult<()> {
        let Some(user_id) = self.cache.consume(&request.token).await? else {
            warn!("reset attempted with invalid or expired token");
            return Err(AuthError::InvalidOrExpiredToken);
        };

        self.policy
            .validate_pair(&request.new_password, &request.confirm_password)
            .inspect_err(|_| warn!("reset token burned by validation failure"))?;

        let password_hash = self.hasher.hash(&request.new_password)?;
        self.store
            .update_password_hash(user_id, &password_hash)
            .await?;

        info!("password reset for user {user_id}");
        Ok(())
    }

    /// Resolve a bearer access token to the owning user's profile
    pub async fn profile(&self, access_token: &str) -> AuthResult<UserProfile> {
        let claims = self.sessions.verify_access(access_token)?;

        match self.store.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => Ok(user.profile()),
            _ => Err(AuthError::InvalidSession),
        }
    }

    /// Resolve an already-authenticated user ID to a profile (for
    /// handlers running behind verification middleware)
    pub async fn profile_by_id(&self, user_id: UserId) -> AuthResult<UserProfile> {
        match self.store.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user.profile()),
            _ => Err(AuthError::InvalidSession),
        }
    }

    /// Exchange a refresh token for a rotated session pair.
    ///
    /// The account is re-checked against the store so a deactivated user
    /// cannot keep a session alive through rotation.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<SessionTokens> {
        let claims = self.sessions.verify_refresh(refresh_token)?;

        match self.store.find_by_id(claims.sub).await? {
            Some(user) if user.is_active => self.sessions.issue(user.id, &user.email),
            _ => Err(AuthError::InvalidSession),
        }
    }

    /// Verify an access token without touching the store (for middleware)
    pub fn verify_access_token(&self, token: &str) -> AuthResult<SessionClaims> {
        self.sessions.verify_access(token)
    }

    /// Probe the credential store, for health checks
    pub async fn health_check(&self) -> AuthResult<()> {
        self.store.ping().await
    }
}

/// Generate a cryptographically random reset token
fn generate_reset_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect()
}
