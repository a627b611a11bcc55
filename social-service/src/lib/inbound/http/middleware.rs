use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::handlers::ApiError;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::IdentityId;
use crate::inbound::http::router::AppState;

/// Identity resolved by the authorization gate.
///
/// Taking this as a handler argument is what makes a route protected: the
/// request is rejected with 401 before the handler runs if the bearer token
/// is missing, malformed, forged or expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity(pub IdentityId);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Non-visible-ASCII header values cannot hold a bearer token.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default());

        match state.gate.authorize(header) {
            Ok(identity_id) => Ok(AuthenticatedIdentity(identity_id)),
            Err(e) => {
                tracing::warn!(
                    reason = e.reason(),
                    method = %parts.method,
                    uri = %parts.uri,
                    "Request rejected by authorization gate"
                );
                Err(ApiError::from(IdentityError::Unauthorized(e)))
            }
        }
    }
}
