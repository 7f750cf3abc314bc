//! Order service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDER_DATABASE_URL` - `PostgreSQL` connection string
//! - `REDIS_URL` - Shared session store
//! - `JWT_SECRET_KEY` - HS256 signing secret shared across services
//! - `USER_SERVICE_URL` - Base URL of the user service (buyer info)
//! - `PRODUCT_SERVICE_URL` - Base URL of the product service (product info)
//!
//! ## Optional
//! - `ORDER_HOST` - Bind address (default: 127.0.0.1)
//! - `ORDER_PORT` - Listen port (default: 8082)
//! - `JWT_ISSUER` - Issuer claim (default: vendly)
//! - `PEER_TIMEOUT_SECS` - Peer call deadline in seconds (default: 10)

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

/// Order service configuration.
#[derive(Debug, Clone)]
pub struct OrderConfig {
    pub database_url: SecretString,
    pub host: IpAddr,
    pub port: u16,
    pub redis_url: SecretString,
    pub jwt_secret: SecretString,
    pub jwt_issuer: String,
    pub user_service_url: String,
    pub product_service_url: String,
    pub peer_timeout: Duration,
}

impl OrderConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ORDER_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDER_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("ORDER_PORT", "8082")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ORDER_PORT".to_owned(), e.to_string()))?;
        let peer_timeout_secs = get_env_or_default("PEER_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PEER_TIMEOUT_SECS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            database_url: get_required_secret("ORDER_DATABASE_URL")?,
            host,
            port,
            redis_url: get_required_secret("REDIS_URL")?,
            jwt_secret: get_required_secret("JWT_SECRET_KEY")?,
            jwt_issuer: get_env_or_default("JWT_ISSUER", "vendly"),
            user_service_url: get_required_env("USER_SERVICE_URL")?.trim_end_matches('/').to_owned(),
            product_service_url: get_required_env("PRODUCT_SERVICE_URL")?
                .trim_end_matches('/')
                .to_owned(),
            peer_timeout: Duration::from_secs(peer_timeout_secs),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
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
