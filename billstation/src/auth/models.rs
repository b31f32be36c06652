//! Authentication data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User ID type
pub type UserId = i64;

/// User model
///
/// Email acts as the username and is stored case-normalized. Records are
/// never physically deleted here; deactivation flips `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Minimal profile view, safe to hand to the HTTP layer
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public profile summary (no credential material)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password reset confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Session tokens (access + refresh pair)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Outcome of a successful registration or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUser {
    pub user: UserProfile,
    pub tokens: SessionTokens,
}

/// Outcome of a forgot-password request.
///
/// The shape is identical whether or not the email was registered, so a
/// caller cannot enumerate accounts from the response. `reset_token` is
/// populated only when the account exists **and** the service was built
/// with token exposure enabled (a development convenience; production
/// deployments deliver the token out of band).
#[derive(Debug, Clone, Serialize)]
pub struct ForgotPasswordReceipt {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    pub expires_in_secs: u64,
}

/// Normalize an email address for lookup and storage.
///
/// Case-insensitive uniqueness is enforced by normalizing before every
/// store operation rather than in the store itself.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
        assert_eq!(normalize_email("a@x.com"), "a@x.com");
    }

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User {
            id: 1,
            email: "a@x.com".to_string(),
            full_name: "A".to_string(),
            password_hash: "secret".to_string(),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(user.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
