//! Password-strength policy.
//!
//! The policy is explicit data rather than framework-level declarative
//! validation: plain predicate checks returning structured errors.

use super::errors::{AuthError, AuthResult};

/// Configurable password-strength requirements
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    /// Minimum password length in bytes
    pub min_length: usize,
    /// Require at least one ASCII digit
    pub require_digit: bool,
    /// Require at least one uppercase letter
    pub require_uppercase: bool,
    /// Require at least one lowercase letter
    pub require_lowercase: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_digit: true,
            require_uppercase: true,
            require_lowercase: true,
        }
    }
}

impl PasswordPolicy {
    /// Validate a password against the policy
    pub fn validate(&self, password: &str) -> AuthResult<()> {
        if password.len() < self.min_length {
            return Err(AuthError::ValidationFailed(format!(
                "Password must be at least {} characters",
                self.min_length
            )));
        }

        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::ValidationFailed(
                "Password must contain at least one number".to_string(),
            ));
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(AuthError::ValidationFailed(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(AuthError::ValidationFailed(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate a password and its confirmation together
    pub fn validate_pair(&self, password: &str, confirmation: &str) -> AuthResult<()> {
        if password != confirmation {
            return Err(AuthError::ValidationFailed(
                "Passwords do not match".to_string(),
            ));
        }
        self.validate(password)
    }
}

/// Minimal email shape check. Full RFC validation is the boundary layer's
/// concern; this only rejects input that cannot possibly be an address.
pub fn validate_email(email: &str) -> AuthResult<()> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::ValidationFailed(
            "Enter a valid email address".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err(AuthError::ValidationFailed(
            "Enter a valid email address".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_accepts_strong_password() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("Abc12345!").is_ok());
    }

    #[test]
    fn test_default_policy_rejects_short_password() {
        let policy = PasswordPolicy::default();
        let err = policy.validate("Ab1").unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
    }

    #[test]
    fn test_default_policy_rejects_missing_character_classes() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate("alllowercase1").is_err());
        assert!(policy.validate("ALLUPPERCASE1").is_err());
        assert!(policy.validate("NoDigitsHere").is_err());
    }

    #[test]
    fn test_relaxed_policy_is_configurable() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_digit: false,
            require_uppercase: false,
            require_lowercase: false,
        };
        assert!(policy.validate("zzzz").is_ok());
        assert!(policy.validate("zzz").is_err());
    }

    #[test]
    fn test_validate_pair_rejects_mismatch() {
        let policy = PasswordPolicy::default();
        let err = policy.validate_pair("Abc12345!", "Xyz98765!").unwrap_err();
        assert!(matches!(err, AuthError::ValidationFailed(_)));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@").is_err());
        assert!(validate_email("a@nodot").is_err());
        assert!(validate_email("a b@x.com").is_err());
    }
}
