use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::errors::TokenError;
use super::handler::JwtHandler;

/// Default lifetime of an access token.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// Issues and validates time-bounded access tokens for a subject.
pub struct TokenService {
    handler: JwtHandler,
    ttl: Duration,
}

impl TokenService {
    /// Create a token service signing with `secret` and the default lifetime.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::days(DEFAULT_TOKEN_TTL_DAYS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        Self {
            handler: JwtHandler::new(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject` expiring one TTL from now.
    ///
    /// # Errors
    /// * `IssuanceFailed` - Signing failed
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        self.handler.encode(&Claims::for_subject(subject, now, self.ttl))
    }

    /// Validate a token and return its subject.
    ///
    /// The signature is checked before the expiry, so a forged token is
    /// always reported as a signature failure even when it is also stale.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match
    /// * `Malformed` - Token cannot be decoded
    /// * `Expired` - `exp` is not in the future
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims: Claims = self.handler.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}
