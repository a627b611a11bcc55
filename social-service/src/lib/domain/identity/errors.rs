use std::fmt;

use thiserror::Error;

/// Error for IdentityId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for Password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Display name must not be empty")]
    Empty,
}

/// Input that failed validation before any store access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordError),

    #[error("Invalid display name: {0}")]
    DisplayName(#[from] DisplayNameError),
}

/// Field that collided with an existing identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Username,
    /// Reported by the store's unique constraint, which does not say which one.
    EmailOrUsername,
}

impl DuplicateField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateField::Email => "email",
            DuplicateField::Username => "username",
            DuplicateField::EmailOrUsername => "email_or_username",
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the authorization gate rejected a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    InvalidScheme,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] auth::TokenError),

    #[error("Invalid token subject: {0}")]
    InvalidSubject(#[from] IdentityIdError),
}

impl AuthorizationError {
    /// Short machine-friendly label for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthorizationError::MissingHeader => "missing_header",
            AuthorizationError::InvalidScheme => "invalid_scheme",
            AuthorizationError::InvalidToken(e) => e.reason(),
            AuthorizationError::InvalidSubject(_) => "invalid_subject",
        }
    }
}

/// Top-level error for all identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{} already exists", .field.as_str())]
    Duplicate { field: DuplicateField },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthorizationError),

    #[error("Identity not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Store operation timed out")]
    StoreTimeout,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl IdentityError {
    pub fn duplicate(field: DuplicateField) -> Self {
        IdentityError::Duplicate { field }
    }
}

impl From<crate::domain::store::StoreTimeout> for IdentityError {
    fn from(_: crate::domain::store::StoreTimeout) -> Self {
        IdentityError::StoreTimeout
    }
}

impl From<auth::PasswordError> for IdentityError {
    fn from(err: auth::PasswordError) -> Self {
        IdentityError::Hashing(err.to_string())
    }
}

impl From<auth::AuthenticationError> for IdentityError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => IdentityError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => IdentityError::Hashing(e.to_string()),
            auth::AuthenticationError::TokenError(e) => IdentityError::TokenIssuance(e.to_string()),
        }
    }
}
