//! Shared application state for the product service.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ProductConfig;
use crate::db::{CategoryStore, ProductStore};

/// Application state shared across all request handlers.
///
/// Cheap to clone; all fields live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ProductConfig,
    pool: PgPool,
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: ProductConfig,
        pool: PgPool,
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                products,
                categories,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProductConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }

    #[must_use]
    pub fn categories(&self) -> &dyn CategoryStore {
        self.inner.categories.as_ref()
    }
}
