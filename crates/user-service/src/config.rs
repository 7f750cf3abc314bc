//! User service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `USER_DATABASE_URL` - `PostgreSQL` connection string
//! - `REDIS_URL` - Shared session store
//! - `JWT_SECRET_KEY` - HS256 signing secret shared across services
//!
//! ## Optional
//! - `USER_HOST` - Bind address (default: 127.0.0.1)
//! - `USER_PORT` - Listen port (default: 8080)
//! - `JWT_ISSUER` - Issuer claim (default: vendly)
//! - `SESSION_TTL_HOURS` - Session lifetime in hours (default: 23)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub redis_url: SecretString,
    pub jwt_secret: SecretString,
    pub jwt_issuer: String,
    pub session_ttl_hours: u64,
}

impl UserConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("USER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("USER_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("USER_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("USER_PORT".to_owned(), e.to_string()))?;
        let session_ttl_hours = get_env_or_default("SESSION_TTL_HOURS", "23")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("SESSION_TTL_HOURS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            database_url: get_required_secret("USER_DATABASE_URL")?,
            host,
            port,
            redis_url: get_required_secret("REDIS_URL")?,
            jwt_secret: get_required_secret("JWT_SECRET_KEY")?,
            jwt_issuer: get_env_or_default("JWT_ISSUER", "vendly"),
            session_ttl_hours,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Session lifetime as a duration.
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_hours * 60 * 60)
    }
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    Ok(SecretString::from(get_required_env(key)?))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
