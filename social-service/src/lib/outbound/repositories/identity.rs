use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::identity::errors::DuplicateField;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::errors::ValidationError;
use crate::domain::identity::models::CredentialHash;
use crate::domain::identity::models::DisplayName;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::IdentityRepository;

pub struct PostgresIdentityRepository {
    pool: PgPool,
}

impl PostgresIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    display_name: String,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A stored row that no longer passes validation is a store fault, not bad input.
impl TryFrom<IdentityRow> for Identity {
    type Error = IdentityError;

    fn try_from(r: IdentityRow) -> Result<Self, Self::Error> {
        let id = r.id;
        let corrupt = |e: ValidationError| {
            tracing::error!(identity_id = %id, error = %e, "Stored identity row is invalid");
            IdentityError::StoreUnavailable(format!("corrupt identity row {}: {}", id, e))
        };

        Ok(Identity {
            id: IdentityId(r.id),
            display_name: DisplayName::new(r.display_name)
                .map_err(|e| corrupt(e.into()))?,
            username: Username::new(r.username).map_err(|e| corrupt(e.into()))?,
            email: EmailAddress::new(r.email).map_err(|e| corrupt(e.into()))?,
            credential_hash: CredentialHash::new(r.password_hash),
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Unique violations on `identities_email_key` / `identities_username_key`
/// are the authoritative duplicate check.
fn store_error(e: sqlx::Error) -> IdentityError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            tracing::debug!(
                constraint = db_err.constraint().unwrap_or("unknown"),
                "Unique constraint rejected identity write"
            );
            return IdentityError::duplicate(DuplicateField::EmailOrUsername);
        }
    }

    match e {
        sqlx::Error::PoolTimedOut => IdentityError::StoreTimeout,
        other => IdentityError::StoreUnavailable(other.to_string()),
    }
}

#[async_trait]
impl IdentityRepository for PostgresIdentityRepository {
    async fn insert(&self, identity: Identity) -> Result<Identity, IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO identities
                (id, display_name, username, email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.display_name.as_str())
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(identity.credential_hash.as_str())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(identity)
    }

    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, display_name, username, email, password_hash, created_at, updated_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, display_name, username, email, password_hash, created_at, updated_at
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, display_name, username, email, password_hash, created_at, updated_at
            FROM identities
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(Identity::try_from).transpose()
    }

    async fn update(&self, identity: Identity) -> Result<Identity, IdentityError> {
        let result = sqlx::query(
            r#"
            UPDATE identities
            SET display_name = $2, username = $3, email = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(identity.id.0)
        .bind(identity.display_name.as_str())
        .bind(identity.username.as_str())
        .bind(identity.email.as_str())
        .bind(identity.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(IdentityError::NotFound(identity.id.to_string()));
        }

        Ok(identity)
    }
}
