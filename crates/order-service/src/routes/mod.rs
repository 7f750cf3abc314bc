//! Route registration.

use axum::{Router, middleware, routing::get};

use vendly_core::{AuthState, require_auth};

use crate::state::AppState;

pub mod orders;

/// All protected routes, behind the auth gate.
pub fn routes(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/admin/orders", get(orders::get_all_admin))
        .route("/admin/orders/{id}", get(orders::get_by_id_admin))
        .layer(middleware::from_fn_with_state(auth, require_auth))
}
