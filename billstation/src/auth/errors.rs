//! Authentication error types.

use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client input failed validation (password mismatch, weak password,
    /// malformed email)
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Email already belongs to a registered user
    #[error("Email already registered")]
    DuplicateEmail,

    /// Login failed. Deliberately covers unknown email, inactive account,
    /// and wrong password so callers cannot enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Reset token is unknown, expired, or already consumed
    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,

    /// Bearer token failed verification (bad signature, expiry, or wrong
    /// token type)
    #[error("Invalid session")]
    InvalidSession,

    /// Store or cache did not respond in time
    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Password hashing failed
    #[error("Password hashing failed")]
    HashingFailed,

    /// JWT encoding error while minting tokens
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for AuthError {
    /// Classify store errors: connection-level failures surface as
    /// `CollaboratorUnavailable` so callers can retry, unique-constraint
    /// violations become `DuplicateEmail` (the atomic-insert contract),
    /// everything else stays a database error.
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AuthError::CollaboratorUnavailable("credential store".to_string())
            }
            sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::DuplicateEmail,
            _ => AuthError::Database(err),
        }
    }
}

impl AuthError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database, JWT, and hashing errors are sanitized to prevent
    /// disclosure of internal system structure. Token values and raw
    /// passwords never appear in any variant.
    pub fn client_message(&self) -> String {
        match self {
            AuthError::Database(_) | AuthError::HashingFailed => {
                "Internal server error".to_string()
            }
            AuthError::Jwt(_) => "Authentication failed".to_string(),
            AuthError::CollaboratorUnavailable(_) => {
                "Service temporarily unavailable".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Whether the failure is transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, AuthError::CollaboratorUnavailable(_))
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_sanitizes_internal_errors() {
        let err = AuthError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");

        let err = AuthError::HashingFailed;
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_message_passes_through_client_errors() {
        let err = AuthError::DuplicateEmail;
        assert_eq!(err.client_message(), "Email already registered");

        let err = AuthError::InvalidCredentials;
        assert_eq!(err.client_message(), "Invalid credentials");
    }

    #[test]
    fn test_pool_timeout_maps_to_collaborator_unavailable() {
        let err: AuthError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AuthError::CollaboratorUnavailable(_)));
        assert!(err.is_retryable());
    }
}
