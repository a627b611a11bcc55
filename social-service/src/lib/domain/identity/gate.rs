use std::sync::Arc;

use auth::Authenticator;

use super::errors::AuthorizationError;
use super::models::IdentityId;

const BEARER_SCHEME: &str = "bearer";

/// Request-time token check for protected operations.
///
/// Resolves the `Authorization` header to an identity id without touching the
/// store. Handlers receive the id as an explicit argument.
#[derive(Clone)]
pub struct AuthorizationGate {
    authenticator: Arc<Authenticator>,
}

impl AuthorizationGate {
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }

    /// Authorize a raw `Authorization` header value.
    ///
    /// # Errors
    /// * `MissingHeader` - No header was sent
    /// * `InvalidScheme` - Header is not `Bearer <token>`
    /// * `InvalidToken` - Signature, format or expiry check failed
    /// * `InvalidSubject` - Token subject is not an identity id
    pub fn authorize(&self, header: Option<&str>) -> Result<IdentityId, AuthorizationError> {
        let header = header.ok_or(AuthorizationError::MissingHeader)?;
        let token = bearer_token(header)?;

        let subject = self.authenticator.validate_token(token)?;

        Ok(IdentityId::from_string(&subject)?)
    }
}

fn bearer_token(header: &str) -> Result<&str, AuthorizationError> {
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthorizationError::InvalidScheme)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(AuthorizationError::InvalidScheme);
    }

    Ok(token)
}
