//! # Billstation
//!
//! A user-authentication backend: registration, login, profile
//! retrieval, and the password-reset token lifecycle, backed by a
//! relational credential store and an ephemeral reset-token cache.
//!
//! ## Architecture
//!
//! The crate is organized around one orchestrator and four collaborator
//! contracts, wired together by explicit dependency injection:
//!
//! - [`auth`]: the `AuthService` orchestrator, request/response models,
//!   the error taxonomy, and the password-strength policy
//! - [`db`]: the credential-store contract with Postgres and in-memory
//!   implementations, pooling, and query timeouts
//! - [`cache`]: the single-use reset-token cache contract with Postgres
//!   and in-memory implementations
//! - [`password`]: Argon2id hashing with a server-side pepper
//! - [`session`]: JWT access/refresh pair issuance with rotation
//!
//! The HTTP surface lives in the separate `bs_server` binary crate and
//! only ever talks to [`auth::AuthService`].

pub mod auth;
pub mod cache;
pub mod db;
pub mod password;
pub mod session;

pub use auth::{AuthError, AuthResult, AuthService};
