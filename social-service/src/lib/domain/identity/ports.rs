use async_trait::async_trait;

use super::errors::IdentityError;
use super::models::AuthSession;
use super::models::EmailAddress;
use super::models::Identity;
use super::models::IdentityId;
use super::models::LoginCommand;
use super::models::RegisterCommand;
use super::models::UpdateProfileCommand;
use super::models::Username;

/// Port for identity domain service operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Register a new identity and issue its first token.
    ///
    /// # Errors
    /// * `Duplicate` - Email or username is taken (pre-check or store constraint)
    /// * `Hashing` - Password hashing failed
    /// * `TokenIssuance` - Identity was stored but no token could be signed
    /// * `StoreTimeout` / `StoreUnavailable` - Store call failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, IdentityError>;

    /// Verify email and password and issue a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Hashing` - Stored hash could not be verified
    /// * `TokenIssuance` - Token signing failed
    /// * `StoreTimeout` / `StoreUnavailable` - Store call failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, IdentityError>;

    /// Retrieve identity by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError>;

    /// Update display name, username or email.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Duplicate` - New username or email belongs to another identity
    async fn update_profile(
        &self,
        id: &IdentityId,
        command: UpdateProfileCommand,
    ) -> Result<Identity, IdentityError>;
}

/// Persistence contract for identities.
///
/// Implementations must enforce uniqueness of `email` and `username`
/// themselves; the service's lookups are only a pre-check.
#[async_trait]
pub trait IdentityRepository: Send + Sync + 'static {
    /// Insert a new identity if neither its email nor its username exists.
    ///
    /// # Errors
    /// * `Duplicate { field: EmailOrUsername }` - Unique constraint rejected the row
    /// * `StoreUnavailable` - Store operation failed
    async fn insert(&self, identity: Identity) -> Result<Identity, IdentityError>;

    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError>;

    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress)
        -> Result<Option<Identity>, IdentityError>;

    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError>;

    /// Replace the mutable fields of an existing identity.
    ///
    /// # Errors
    /// * `NotFound` - Identity does not exist
    /// * `Duplicate { field: EmailOrUsername }` - Unique constraint rejected the change
    /// * `StoreUnavailable` - Store operation failed
    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError>;
}
