use std::env;
use std::time::Duration;

use auth::HashCost;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Signing key used only when `jwt.allow_insecure_fallback` is switched on.
///
/// Anyone who reads this file can forge tokens for a deployment that uses it.
pub const INSECURE_FALLBACK_SECRET: &str =
    "social_service_insecure_fallback_secret_do_not_use_in_production";

const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: Option<String>,
    #[serde(default = "default_expiration_days")]
    pub expiration_days: i64,
    #[serde(default)]
    pub allow_insecure_fallback: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    pub iterations: Option<u32>,
    pub memory_kib: Option<u32>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_store_timeout_secs() -> u64 {
    crate::domain::store::DEFAULT_STORE_TIMEOUT.as_secs()
}

fn default_expiration_days() -> i64 {
    auth::jwt::DEFAULT_TOKEN_TTL_DAYS
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

impl DatabaseConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl JwtConfig {
    /// Resolve the token signing secret.
    ///
    /// A missing secret is a startup error unless the insecure fallback was
    /// explicitly allowed, in which case every start logs a warning.
    pub fn signing_secret(&self) -> Result<String, ConfigError> {
        match self.secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => {
                if secret.len() < MIN_SECRET_BYTES {
                    tracing::warn!(
                        length = secret.len(),
                        minimum = MIN_SECRET_BYTES,
                        "JWT signing secret is shorter than recommended"
                    );
                }
                Ok(secret.to_string())
            }
            _ if self.allow_insecure_fallback => {
                tracing::warn!(
                    "jwt.secret is not set: signing tokens with the built-in fallback secret. \
                     Tokens from this deployment can be forged. Set JWT__SECRET."
                );
                Ok(INSECURE_FALLBACK_SECRET.to_string())
            }
            _ => Err(ConfigError::Message(
                "jwt.secret is not set (set JWT__SECRET, or jwt.allow_insecure_fallback = true \
                 for local development only)"
                    .to_string(),
            )),
        }
    }

    /// Token lifetime.
    ///
    /// # Errors
    /// * `Message` - `expiration_days` is below 1 or out of range
    pub fn token_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        if self.expiration_days < 1 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_days must be at least 1, got {}",
                self.expiration_days
            )));
        }

        chrono::Duration::try_days(self.expiration_days).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.expiration_days is out of range: {}",
                self.expiration_days
            ))
        })
    }
}

impl PasswordConfig {
    pub fn hash_cost(&self) -> HashCost {
        HashCost {
            iterations: self.iterations,
            memory_kib: self.memory_kib,
        }
    }
}
