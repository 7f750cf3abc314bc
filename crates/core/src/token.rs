//! HS256 access token handling.
//!
//! The token is only a structurally-verifiable wrapper around the session
//! key: the auth gate checks the signature here, then resolves identity from
//! the session store. No claim in the token is authoritative for identity.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Signing configuration shared by issue and verify paths.
#[derive(Clone)]
pub struct JwtConfig {
    secret: SecretString,
    issuer: String,
    expiry_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

/// Token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Issuer.
    pub iss: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl JwtConfig {
    #[must_use]
    pub fn new(secret: SecretString, issuer: impl Into<String>, expiry_hours: i64) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            expiry_hours,
        }
    }

    /// Issue a signed token for a user.
    ///
    /// # Errors
    ///
    /// Returns the underlying `jsonwebtoken` error if signing fails.
    pub fn issue(&self, user_id: i64) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
    }

    /// Verify a token's signature, expiry, and issuer.
    ///
    /// # Errors
    ///
    /// Returns the underlying `jsonwebtoken` error on any structural failure.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new(SecretString::from("unit-test-signing-key"), "vendly", 23)
    }

    #[test]
    fn test_issue_and_verify() {
        let config = config();
        let token = config.issue(7).expect("issue");
        let claims = config.verify(&token).expect("verify");
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.iss, "vendly");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = config().issue(7).expect("issue");
        let other = JwtConfig::new(SecretString::from("a-different-key"), "vendly", 23);
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer_rejected() {
        let issuer_a = config();
        let issuer_b = JwtConfig::new(SecretString::from("unit-test-signing-key"), "someone", 23);
        let token = issuer_b.issue(7).expect("issue");
        assert!(issuer_a.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(config().verify("not-a-token").is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", config());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("unit-test-signing-key"));
    }
}
