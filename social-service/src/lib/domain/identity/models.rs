use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::errors::DisplayNameError;
use super::errors::EmailError;
use super::errors::IdentityIdError;
use super::errors::PasswordError;
use super::errors::UsernameError;
use super::errors::ValidationError;

/// Identity aggregate entity.
///
/// Represents a registered account. The credential hash never leaves the
/// domain and outbound layers.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: IdentityId,
    pub display_name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub credential_hash: CredentialHash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentityId(pub Uuid);

impl IdentityId {
    /// Generate a new random identity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identity ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, IdentityIdError> {
        Uuid::parse_str(s)
            .map(IdentityId)
            .map_err(|e| IdentityIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for IdentityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-30 characters. Comparison is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 30;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 30 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Free-text name shown next to a user's posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        if name.trim().is_empty() {
            Err(DisplayNameError::Empty)
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Plaintext password accepted for registration.
///
/// Never printed; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Password shorter than 6 characters
    pub fn new(password: String) -> Result<Self, PasswordError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            Err(PasswordError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(password))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// One-way password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(String);

impl CredentialHash {
    pub fn new(hash: String) -> Self {
        Self(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Command to register a new identity with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub display_name: DisplayName,
    pub username: Username,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// # Errors
    /// * `ValidationError` - First field that failed validation
    pub fn new(
        display_name: String,
        username: String,
        email: String,
        password: String,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            display_name: DisplayName::new(display_name)?,
            username: Username::new(username)?,
            email: EmailAddress::new(email)?,
            password: Password::new(password)?,
        })
    }
}

/// Command to log in with email and password.
///
/// The password is not length-checked: a short password simply fails to verify.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl LoginCommand {
    /// # Errors
    /// * `ValidationError` - Email is not well-formed
    pub fn new(email: String, password: String) -> Result<Self, ValidationError> {
        Ok(Self {
            email: EmailAddress::new(email)?,
            password: Password(password),
        })
    }
}

/// Command to update a profile with optional validated fields.
///
/// Only provided fields are changed.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub display_name: Option<DisplayName>,
    pub username: Option<Username>,
    pub email: Option<EmailAddress>,
}

impl UpdateProfileCommand {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.username.is_none() && self.email.is_none()
    }
}

/// Identity paired with a freshly issued access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub identity: Identity,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_bounds() {
        assert!(Username::new("abc".to_string()).is_ok());
        assert!(Username::new("a".repeat(30)).is_ok());
        assert_eq!(
            Username::new("ab".to_string()),
            Err(UsernameError::TooShort { min: 3, actual: 2 })
        );
        assert_eq!(
            Username::new("a".repeat(31)),
            Err(UsernameError::TooLong {
                max: 30,
                actual: 31
            })
        );
    }

    #[test]
    fn test_username_counts_characters_not_bytes() {
        assert!(Username::new("ééé".to_string()).is_ok());
    }

    #[test]
    fn test_email_grammar() {
        assert!(EmailAddress::new("jane@x.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new("".to_string()).is_err());
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("secret".to_string()).is_ok());
        assert_eq!(
            Password::new("short".to_string()),
            Err(PasswordError::TooShort { min: 6, actual: 5 })
        );
    }

    #[test]
    fn test_display_name_not_blank() {
        assert!(DisplayName::new("Jane Doe".to_string()).is_ok());
        assert_eq!(DisplayName::new("  ".to_string()), Err(DisplayNameError::Empty));
    }

    #[test]
    fn test_secrets_are_redacted_in_debug() {
        let password = Password::new("secret1".to_string()).unwrap();
        let hash = CredentialHash::new("$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string());

        assert!(!format!("{password:?}").contains("secret1"));
        assert!(!format!("{hash:?}").contains("argon2id"));
    }

    #[test]
    fn test_register_command_validates_every_field() {
        let ok = RegisterCommand::new(
            "Jane Doe".to_string(),
            "janed".to_string(),
            "jane@x.com".to_string(),
            "secret1".to_string(),
        );
        assert!(ok.is_ok());

        let bad_email = RegisterCommand::new(
            "Jane Doe".to_string(),
            "janed".to_string(),
            "jane".to_string(),
            "secret1".to_string(),
        );
        assert!(matches!(bad_email, Err(ValidationError::Email(_))));

        let bad_password = RegisterCommand::new(
            "Jane Doe".to_string(),
            "janed".to_string(),
            "jane@x.com".to_string(),
            "123".to_string(),
        );
        assert!(matches!(bad_password, Err(ValidationError::Password(_))));
    }
}
