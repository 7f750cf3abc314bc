//! Shared application state for the user service.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::UserConfig;
use crate::db::UserStore;
use crate::services::SignInService;

/// Application state shared across all request handlers.
///
/// Cheap to clone; all fields live behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: UserConfig,
    pool: PgPool,
    users: Arc<dyn UserStore>,
    sign_in: SignInService,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: UserConfig,
        pool: PgPool,
        users: Arc<dyn UserStore>,
        sign_in: SignInService,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                users,
                sign_in,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &UserConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    #[must_use]
    pub fn sign_in_service(&self) -> &SignInService {
        &self.inner.sign_in
    }
}
