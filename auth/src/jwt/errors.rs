use thiserror::Error;

/// Error type for token operations.
///
/// Validation failures are split by cause so callers can log them apart,
/// even though all of them end in the same rejection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to issue token: {0}")]
    IssuanceFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token is expired")]
    Expired,
}

impl TokenError {
    /// Short machine-friendly label for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::IssuanceFailed(_) => "issuance_failed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Malformed(_) => "malformed",
            TokenError::Expired => "expired",
        }
    }
}
