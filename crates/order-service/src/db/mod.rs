//! Database operations for the order service `PostgreSQL`.
//!
//! # Database: `vendly_orders`
//!
//! ## Tables
//!
//! - `orders` - Order headers
//! - `order_items` - Line items (`product_id` + `quantity`; no product detail)
//!
//! # Migrations
//!
//! Migrations live in `crates/order-service/migrations/` and are applied
//! explicitly with `sqlx migrate run`; they do not run on startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use vendly_core::ServiceError;

pub mod orders;

pub use orders::{OrderStore, PgOrderStore};

/// Repository-level failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The filtered result set is empty, or the entity is absent. The
    /// platform's list endpoints treat this as an error, not an empty page.
    #[error("not found")]
    NotFound,

    /// Query failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("order not found".to_owned()),
            RepositoryError::Database(e) => Self::Internal(format!("database error: {e}")),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
