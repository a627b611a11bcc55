use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Plaintext hashed once per hasher to give unknown-account logins the same cost
/// as a wrong-password login.
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-accounts";

/// Argon2id cost parameters.
///
/// Unset fields fall back to the argon2 crate defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HashCost {
    /// Number of passes over memory (t_cost)
    pub iterations: Option<u32>,
    /// Memory size in KiB (m_cost)
    pub memory_kib: Option<u32>,
}

impl HashCost {
    fn params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            self.iterations.unwrap_or(Params::DEFAULT_T_COST),
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| PasswordError::InvalidCost(e.to_string()))
    }
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Every hash carries its own random salt and parameters in PHC string format,
/// so verification keeps working after the configured cost changes.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: OnceLock<String>,
}

impl PasswordHasher {
    /// Create a new password hasher with the argon2 default cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
            dummy_hash: OnceLock::new(),
        }
    }

    /// Create a password hasher with an explicit cost.
    ///
    /// # Errors
    /// * `InvalidCost` - Parameters are outside the ranges argon2 accepts
    pub fn with_cost(cost: HashCost) -> Result<Self, PasswordError> {
        let params = cost.params()?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: OnceLock::new(),
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison is constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid or verification failed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    /// Run a full verification against a throwaway hash and discard the outcome.
    ///
    /// # Errors
    /// * `HashingFailed` - The dummy hash could not be produced
    pub fn verify_dummy(&self, password: &str) -> Result<(), PasswordError> {
        let hash = match self.dummy_hash.get() {
            Some(hash) => hash,
            None => {
                let hash = self.hash(DUMMY_PASSWORD)?;
                self.dummy_hash.get_or_init(|| hash)
            }
        };

        self.verify(password, hash).map(|_| ())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
