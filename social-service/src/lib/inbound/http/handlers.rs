use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::Identity;
use crate::domain::post::errors::PostError;
use crate::domain::post::models::Post;

pub mod create_post;
pub mod get_profile;
pub mod list_posts;
pub mod login;
pub mod register;
pub mod update_profile;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    /// 400 naming the field that collided.
    Duplicate { message: String, field: String },
    NotFound(String),
    Unauthorized(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "Unhandled error");
        Self::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, field) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Duplicate { message, field } => {
                (StatusCode::BAD_REQUEST, message, Some(field))
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None),
        };

        (status, Json(ApiResponseBody::new_error(status, message, field))).into_response()
    }
}

/// Infrastructure failures are logged here and reach the caller as a generic 500.
impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Validation(_) => ApiError::BadRequest(err.to_string()),
            IdentityError::Duplicate { field } => ApiError::Duplicate {
                message: err.to_string(),
                field: field.as_str().to_string(),
            },
            IdentityError::InvalidCredentials | IdentityError::Unauthorized(_) => {
                ApiError::Unauthorized(err.to_string())
            }
            IdentityError::NotFound(_) => ApiError::NotFound(err.to_string()),
            IdentityError::Hashing(_)
            | IdentityError::TokenIssuance(_)
            | IdentityError::StoreTimeout
            | IdentityError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Identity operation failed");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::InvalidContent(_) => ApiError::BadRequest(err.to_string()),
            PostError::AuthorNotFound(_) => ApiError::NotFound(err.to_string()),
            PostError::StoreTimeout | PostError::StoreUnavailable(_) => {
                tracing::error!(error = %err, "Post operation failed");
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, field: Option<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message, field },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Public view of an identity. Never carries the credential hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Identity> for UserData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            name: identity.display_name.as_str().to_string(),
            username: identity.username.as_str().to_string(),
            email: identity.email.as_str().to_string(),
            created_at: identity.created_at,
            updated_at: identity.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostData {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostData {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.to_string(),
            author_id: post.author_id.to_string(),
            author_name: post.author.display_name.clone(),
            author_username: post.author.username.clone(),
            content: post.content.as_str().to_string(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::errors::AuthorizationError;
    use crate::domain::identity::errors::DuplicateField;
    use crate::domain::identity::errors::PasswordError;
    use crate::domain::identity::errors::ValidationError;

    #[test]
    fn test_identity_error_status_mapping() {
        let validation = IdentityError::Validation(ValidationError::Password(
            PasswordError::TooShort { min: 6, actual: 3 },
        ));
        assert!(matches!(ApiError::from(validation), ApiError::BadRequest(_)));

        assert_eq!(
            ApiError::from(IdentityError::duplicate(DuplicateField::Email)),
            ApiError::Duplicate {
                message: "email already exists".to_string(),
                field: "email".to_string(),
            }
        );

        assert_eq!(
            ApiError::from(IdentityError::InvalidCredentials),
            ApiError::Unauthorized("Invalid email or password".to_string())
        );
        assert!(matches!(
            ApiError::from(IdentityError::Unauthorized(AuthorizationError::MissingHeader)),
            ApiError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_infrastructure_errors_hide_details() {
        for err in [
            IdentityError::Hashing("argon2 blew up".to_string()),
            IdentityError::TokenIssuance("bad key".to_string()),
            IdentityError::StoreTimeout,
            IdentityError::StoreUnavailable("connection refused".to_string()),
        ] {
            assert_eq!(
                ApiError::from(err),
                ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
            );
        }

        assert_eq!(
            ApiError::from(PostError::StoreUnavailable("down".to_string())),
            ApiError::InternalServerError(INTERNAL_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_error_body_omits_absent_field() {
        let body = ApiResponseBody::new_error(StatusCode::NOT_FOUND, "gone".to_string(), None);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status_code": 404, "data": {"message": "gone"}})
        );
    }
}
