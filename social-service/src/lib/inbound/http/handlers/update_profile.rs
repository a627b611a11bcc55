use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::identity::errors::DisplayNameError;
use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::UsernameError;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::UpdateProfileCommand;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::middleware::AuthenticatedIdentity;
use crate::inbound::http::router::AppState;

pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedIdentity(identity_id): AuthenticatedIdentity,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .identity_service
        .update_profile(&identity_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

/// HTTP request body for updating a profile (all fields optional)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateProfileRequest {
    name: Option<String>,
    username: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateProfileRequestError {
    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),

    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

/// An empty string means the field was not provided.
fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, ParseUpdateProfileRequestError> {
        Ok(UpdateProfileCommand {
            display_name: provided(self.name).map(DisplayName::new).transpose()?,
            username: provided(self.username).map(Username::new).transpose()?,
            email: provided(self.email).map(EmailAddress::new).transpose()?,
        })
    }
}

impl From<ParseUpdateProfileRequestError> for ApiError {
    fn from(err: ParseUpdateProfileRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_request_parses() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"name": "Jane D"}"#).unwrap();
        let command = request.try_into_command().unwrap();

        assert_eq!(command.display_name.unwrap().as_str(), "Jane D");
        assert!(command.username.is_none());
        assert!(command.email.is_none());
    }

    #[test]
    fn test_invalid_username_rejected() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"username": "ab"}"#).unwrap();
        assert!(matches!(
            request.try_into_command(),
            Err(ParseUpdateProfileRequestError::Username(_))
        ));
    }

    #[test]
    fn test_empty_strings_leave_fields_unchanged() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"name": "", "username": "", "email": "jane@y.com"}"#)
                .unwrap();
        let command = request.try_into_command().unwrap();

        assert!(command.display_name.is_none());
        assert!(command.username.is_none());
        assert_eq!(command.email.unwrap().as_str(), "jane@y.com");
    }

    #[test]
    fn test_blank_name_still_rejected() {
        let request: UpdateProfileRequest =
            serde_json::from_str(r#"{"name": "   "}"#).unwrap();
        assert!(matches!(
            request.try_into_command(),
            Err(ParseUpdateProfileRequestError::DisplayName(_))
        ));
    }
}
