//! Authentication module providing registration, login, and the
//! password-reset token lifecycle.
//!
//! The orchestrator takes its collaborators as explicit dependencies:
//! - Credential store ([`crate::db::UserStore`])
//! - Reset-token cache ([`crate::cache::TokenCache`])
//! - Password hasher ([`crate::password::CredentialHasher`])
//! - Session issuer ([`crate::session::SessionIssuer`])
//!
//! ## Example
//!
//! ```no_run
//! use billstation::auth::{AuthService, RegisterRequest};
//! use billstation::cache::MemoryTokenCache;
//! use billstation::db::MemoryUserStore;
//! use billstation::password::Argon2Hasher;
//! use billstation::session::SessionIssuer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = AuthService::new(
//!         Arc::new(MemoryUserStore::new()),
//!         Arc::new(MemoryTokenCache::new()),
//!         Arc::new(Argon2Hasher::new("secret_pepper".to_string())),
//!         SessionIssuer::new("jwt_secret_0123456789_0123456789".to_string()),
//!     );
//!
//!     let request = RegisterRequest {
//!         email: "user@example.com".to_string(),
//!         full_name: "Jane Doe".to_string(),
//!         password: "SecurePass123".to_string(),
//!         password_confirm: "SecurePass123".to_string(),
//!     };
//!
//!     let authed = auth.register(request).await?;
//!     println!("Registered user: {}", authed.user.email);
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod models;
pub mod policy;
pub mod service;

pub use errors::{AuthError, AuthResult};
pub use models::{
    AuthenticatedUser, ForgotPasswordReceipt, LoginRequest, RegisterRequest,
    ResetPasswordRequest, SessionTokens, User, UserId, UserProfile, normalize_email,
};
pub use policy::{PasswordPolicy, validate_email};
pub use service::{AuthService, DEFAULT_RESET_TOKEN_TTL};
