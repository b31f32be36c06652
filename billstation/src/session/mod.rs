//! Session issuance and verification.
//!
//! Bearer credentials are stateless JWTs with a fixed claim set
//! (subject, email, token type, issuance, expiry) and an HS256 integrity
//! tag. Access tokens are short-lived; refresh tokens are long-lived and
//! exchanged for a brand-new pair on every refresh (rotation). Nothing
//! is stored server-side, so there is no revocation list; rotation plus
//! short access lifetimes bound the damage of a leaked token.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthError, AuthResult, SessionTokens, UserId};

/// Discriminates the two halves of a session pair so an access token can
/// never be replayed as a refresh token or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims carried by both token types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User ID
    pub sub: UserId,
    pub email: String,
    pub token_type: TokenType,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Mints and validates session token pairs
#[derive(Clone)]
pub struct SessionIssuer {
    jwt_secret: String,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl SessionIssuer {
    /// Create an issuer with the default lifetimes: 15-minute access
    /// tokens, 7-day refresh tokens.
    pub fn new(jwt_secret: String) -> Self {
        Self::with_durations(jwt_secret, Duration::minutes(15), Duration::days(7))
    }

    /// Create an issuer with explicit lifetimes. The access lifetime is
    /// expected to be much shorter than the refresh lifetime; server
    /// configuration validates that before constructing one.
    pub fn with_durations(
        jwt_secret: String,
        access_token_duration: Duration,
        refresh_token_duration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            access_token_duration,
            refresh_token_duration,
        }
    }

    /// Mint a fresh access + refresh pair for an authenticated identity
    pub fn issue(&self, user_id: UserId, email: &str) -> AuthResult<SessionTokens> {
        let access_token = self.generate(user_id, email, TokenType::Access)?;
        let refresh_token = self.generate(user_id, email, TokenType::Refresh)?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token and return its claims
    pub fn verify_access(&self, token: &str) -> AuthResult<SessionClaims> {
        self.verify(token, TokenType::Access)
    }

    /// Verify a refresh token and return its claims
    pub fn verify_refresh(&self, token: &str) -> AuthResult<SessionClaims> {
        self.verify(token, TokenType::Refresh)
    }

    /// Exchange a valid refresh token for a rotated pair
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<SessionTokens> {
        let claims = self.verify_refresh(refresh_token)?;
        self.issue(claims.sub, &claims.email)
    }

    fn generate(&self, user_id: UserId, email: &str, token_type: TokenType) -> AuthResult<String> {
        let now = Utc::now();
        let duration = match token_type {
            TokenType::Access => self.access_token_duration,
            TokenType::Refresh => self.refresh_token_duration,
        };

        let claims = SessionClaims {
            sub: user_id,
            email: email.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + duration).timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Signature, expiry, and token-type checks all collapse into one
    /// `InvalidSession` so a caller learns nothing beyond "invalid".
    fn verify(&self, token: &str, expected: TokenType) -> AuthResult<SessionClaims> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|_| AuthError::InvalidSession)?;

        if token_data.claims.token_type != expected {
            return Err(AuthError::InvalidSession);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> SessionIssuer {
        SessionIssuer::new("test_secret_key_for_jwt_0123456789".to_string())
    }

    #[test]
    fn test_issue_and_verify_pair() {
        let issuer = issuer();
        let tokens = issuer.issue(42, "a@x.com").expect("issue should succeed");

        let access = issuer.verify_access(&tokens.access_token).unwrap();
        assert_eq!(access.sub, 42);
        assert_eq!(access.email, "a@x.com");
        assert_eq!(access.token_type, TokenType::Access);

        let refresh = issuer.verify_refresh(&tokens.refresh_token).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let issuer = issuer();
        let tokens = issuer.issue(1, "a@x.com").unwrap();

        assert!(matches!(
            issuer.verify_access(&tokens.refresh_token),
            Err(AuthError::InvalidSession)
        ));
        assert!(matches!(
            issuer.verify_refresh(&tokens.access_token),
            Err(AuthError::InvalidSession)
        ));
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let issuer = issuer();
        let tokens = issuer.issue(1, "a@x.com").unwrap();

        let mut tampered = tokens.access_token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(matches!(
            issuer.verify_access(&tampered),
            Err(AuthError::InvalidSession)
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer_a = issuer();
        let issuer_b = SessionIssuer::new("another_secret_entirely_9876543210".to_string());

        let tokens = issuer_a.issue(1, "a@x.com").unwrap();
        assert!(issuer_b.verify_access(&tokens.access_token).is_err());
    }

    #[test]
    fn test_expired_access_token_is_rejected() {
        let expired = SessionIssuer::with_durations(
            "test_secret_key_for_jwt_0123456789".to_string(),
            Duration::seconds(-60),
            Duration::days(7),
        );

        let tokens = expired.issue(1, "a@x.com").unwrap();
        assert!(matches!(
            expired.verify_access(&tokens.access_token),
            Err(AuthError::InvalidSession)
        ));
    }

    #[test]
    fn test_refresh_rotates_the_pair() {
        let issuer = issuer();
        let tokens = issuer.issue(7, "a@x.com").unwrap();

        let rotated = issuer.refresh(&tokens.refresh_token).unwrap();
        let claims = issuer.verify_access(&rotated.access_token).unwrap();
        assert_eq!(claims.sub, 7);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(issuer().verify_access("invalid.jwt.token").is_err());
    }
}
