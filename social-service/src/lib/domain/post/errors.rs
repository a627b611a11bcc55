use thiserror::Error;

use crate::domain::identity::errors::IdentityError;
use crate::domain::store::StoreTimeout;

/// Error for PostContent validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PostContentError {
    #[error("Post content must not be empty")]
    Empty,

    #[error("Post content too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for post operations
#[derive(Debug, Clone, Error)]
pub enum PostError {
    #[error("Invalid post: {0}")]
    InvalidContent(#[from] PostContentError),

    #[error("Author not found: {0}")]
    AuthorNotFound(String),

    #[error("Store operation timed out")]
    StoreTimeout,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreTimeout> for PostError {
    fn from(_: StoreTimeout) -> Self {
        PostError::StoreTimeout
    }
}

/// Author lookups go through the identity store.
impl From<IdentityError> for PostError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::StoreTimeout => PostError::StoreTimeout,
            IdentityError::NotFound(id) => PostError::AuthorNotFound(id),
            other => PostError::StoreUnavailable(other.to_string()),
        }
    }
}
