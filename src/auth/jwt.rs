//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying `{sub, exp}` and nothing else. Validity is
//! purely a function of signature and expiry at verification time; nothing is
//! persisted server-side and nothing can be revoked early.

use crate::auth::models::Claims;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

pub struct TokenService {
    secret: String,
    expire_minutes: i64,
}

impl TokenService {
    pub fn new(secret: String, expire_minutes: i64) -> Self {
        Self {
            secret,
            expire_minutes,
        }
    }

    /// Issue a token for `subject` with the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_with_ttl(subject, Duration::minutes(self.expire_minutes))
    }

    /// Issue a token for `subject` expiring `ttl` from now.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(ttl)
            .context("Invalid expiry timestamp")?
            .timestamp() as usize;

        let claims = Claims {
            sub: subject.to_string(),
            exp: expiration,
        };

        debug!(subject, ttl_secs = ttl.num_seconds(), "Issuing access token");

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Validate a token and return its subject.
    ///
    /// Bad signature, unparsable payload, missing subject, and passed expiry
    /// all fail the same way; callers must not distinguish them. Expiry is an
    /// exact check against server time, no leeway.
    pub fn validate(&self, token: &str) -> Result<String> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid or expired token")?;

        // `exp` is exclusive: a token expiring this second is already invalid.
        if decoded.claims.exp as i64 <= Utc::now().timestamp() {
            anyhow::bail!("Token expired");
        }

        Ok(decoded.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn service() -> TokenService {
        TokenService::new("test-secret-key-12345".to_string(), 30)
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = service();
        let token = tokens.issue("alice").unwrap();
        assert!(!token.is_empty());
        assert_eq!(tokens.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(service().validate("invalid.token.here").is_err());
    }

    #[test]
    fn test_different_secret_rejected() {
        let issuer = TokenService::new("secret-one".to_string(), 30);
        let verifier = TokenService::new("secret-two".to_string(), 30);

        let token = issuer.issue("alice").unwrap();
        assert!(verifier.validate(&token).is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let tokens = service();
        let token = tokens.issue_with_ttl("alice", Duration::zero()).unwrap();
        assert!(tokens.validate(&token).is_err());
    }

    #[test]
    fn test_already_expired_rejected() {
        let tokens = service();
        let token = tokens
            .issue_with_ttl("alice", Duration::minutes(-5))
            .unwrap();
        assert!(tokens.validate(&token).is_err());
    }

    #[test]
    fn test_missing_subject_rejected() {
        let tokens = service();
        let exp = (Utc::now() + Duration::minutes(5)).timestamp();
        let token = encode(
            &Header::default(),
            &json!({ "exp": exp }),
            &EncodingKey::from_secret("test-secret-key-12345".as_bytes()),
        )
        .unwrap();

        assert!(tokens.validate(&token).is_err());
    }

    #[test]
    fn test_truncated_token_rejected() {
        let tokens = service();
        let token = tokens.issue("alice").unwrap();
        let truncated = &token[..token.len() - 1];
        assert!(tokens.validate(truncated).is_err());
    }
}
