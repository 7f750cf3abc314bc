//! Shared application state for the order service.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::OrderConfig;
use crate::services::OrderAggregator;

/// Application state shared across all request handlers.
///
/// Cheap to clone; all fields live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: OrderConfig,
    pool: PgPool,
    aggregator: OrderAggregator,
}

impl AppState {
    #[must_use]
    pub fn new(config: OrderConfig, pool: PgPool, aggregator: OrderAggregator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                aggregator,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &OrderConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn aggregator(&self) -> &OrderAggregator {
        &self.inner.aggregator
    }
}
