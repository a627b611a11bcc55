use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::register::AuthSessionData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::LoginCommand;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    // A malformed email cannot match any account; answer like a wrong password.
    let command = LoginCommand::new(body.email, body.password)
        .map_err(|_| ApiError::from(IdentityError::InvalidCredentials))?;

    state
        .identity_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
