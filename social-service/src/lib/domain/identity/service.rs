use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use super::errors::DuplicateField;
use super::errors::IdentityError;
use super::models::AuthSession;
use super::models::CredentialHash;
use super::models::Identity;
use super::models::IdentityId;
use super::models::LoginCommand;
use super::models::RegisterCommand;
use super::models::UpdateProfileCommand;
use super::ports::IdentityRepository;
use super::ports::IdentityServicePort;
use crate::domain::store::bounded;

/// Domain service implementation for identity operations.
///
/// Concrete implementation of IdentityServicePort with dependency injection.
/// Every store call is bounded by `store_timeout`; hashing runs on the
/// blocking pool.
pub struct IdentityService<IR>
where
    IR: IdentityRepository,
{
    repository: Arc<IR>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
}

impl<IR> IdentityService<IR>
where
    IR: IdentityRepository,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Identity persistence implementation
    /// * `authenticator` - Password hasher and token issuer
    /// * `store_timeout` - Deadline applied to each store call
    pub fn new(
        repository: Arc<IR>,
        authenticator: Arc<Authenticator>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            authenticator,
            store_timeout,
        }
    }

    async fn off_runtime<T, F>(&self, work: F) -> Result<T, IdentityError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| IdentityError::Hashing(e.to_string()))
    }

    async fn find_existing(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        bounded(self.store_timeout, self.repository.find_by_id(id))
            .await?
            .ok_or(IdentityError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<IR> IdentityServicePort for IdentityService<IR>
where
    IR: IdentityRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, IdentityError> {
        let RegisterCommand {
            display_name,
            username,
            email,
            password,
        } = command;

        if bounded(self.store_timeout, self.repository.find_by_email(&email))
            .await?
            .is_some()
        {
            tracing::info!(%username, "Registration rejected: email already exists");
            return Err(IdentityError::duplicate(DuplicateField::Email));
        }

        if bounded(self.store_timeout, self.repository.find_by_username(&username))
            .await?
            .is_some()
        {
            tracing::info!(%username, "Registration rejected: username already exists");
            return Err(IdentityError::duplicate(DuplicateField::Username));
        }

        let credential_hash = self
            .off_runtime(move |authenticator| authenticator.hash_password(password.as_str()))
            .await?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                IdentityError::from(e)
            })?;

        let now = Utc::now();
        let identity = Identity {
            id: IdentityId::new(),
            display_name,
            username,
            email,
            credential_hash: CredentialHash::new(credential_hash),
            created_at: now,
            updated_at: now,
        };

        let created = bounded(self.store_timeout, self.repository.insert(identity))
            .await
            .map_err(|e| {
                if let IdentityError::Duplicate { .. } = e {
                    tracing::info!("Registration lost a uniqueness race at insert");
                }
                e
            })?;

        let token = self
            .authenticator
            .issue_token(&created.id.to_string())
            .map_err(|e| {
                tracing::error!(
                    identity_id = %created.id,
                    error = %e,
                    "Identity created but token issuance failed"
                );
                IdentityError::TokenIssuance(e.to_string())
            })?;

        tracing::info!(
            identity_id = %created.id,
            username = %created.username,
            "Identity registered"
        );

        Ok(AuthSession {
            identity: created,
            token,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, IdentityError> {
        let LoginCommand { email, password } = command;

        let identity = bounded(self.store_timeout, self.repository.find_by_email(&email)).await?;

        let Some(identity) = identity else {
            let rejection = self
                .off_runtime(move |authenticator| authenticator.reject_unknown(password.as_str()))
                .await?;
            tracing::info!("Login rejected: invalid credentials");
            return Err(rejection.into());
        };

        let stored_hash = identity.credential_hash.clone();
        let subject = identity.id.to_string();
        let result = self
            .off_runtime(move |authenticator| {
                authenticator.authenticate(password.as_str(), stored_hash.as_str(), &subject)
            })
            .await?
            .map_err(|e| {
                let err = IdentityError::from(e);
                match &err {
                    IdentityError::InvalidCredentials => {
                        tracing::info!("Login rejected: invalid credentials")
                    }
                    other => {
                        tracing::error!(identity_id = %identity.id, error = %other, "Login failed")
                    }
                }
                err
            })?;

        tracing::info!(identity_id = %identity.id, "Identity logged in");

        Ok(AuthSession {
            identity,
            token: result.access_token,
        })
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<Identity, IdentityError> {
        self.find_existing(id).await
    }

    async fn update_profile(
        &self,
        id: &IdentityId,
        command: UpdateProfileCommand,
    ) -> Result<Identity, IdentityError> {
        let mut identity = self.find_existing(id).await?;

        if command.is_empty() {
            return Ok(identity);
        }

        if let Some(new_username) = command.username {
            if new_username != identity.username {
                let holder = bounded(
                    self.store_timeout,
                    self.repository.find_by_username(&new_username),
                )
                .await?;
                if holder.is_some_and(|other| other.id != identity.id) {
                    return Err(IdentityError::duplicate(DuplicateField::Username));
                }
            }
            identity.username = new_username;
        }

        if let Some(new_email) = command.email {
            if new_email != identity.email {
                let holder =
                    bounded(self.store_timeout, self.repository.find_by_email(&new_email)).await?;
                if holder.is_some_and(|other| other.id != identity.id) {
                    return Err(IdentityError::duplicate(DuplicateField::Email));
                }
            }
            identity.email = new_email;
        }

        if let Some(new_display_name) = command.display_name {
            identity.display_name = new_display_name;
        }

        identity.updated_at = Utc::now();

        let updated = bounded(self.store_timeout, self.repository.update(identity)).await?;
        tracing::info!(identity_id = %updated.id, "Profile updated");

        Ok(updated)
    }
}
