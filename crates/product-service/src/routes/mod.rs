//! Route registration.

use axum::{Router, middleware, routing::get};

use vendly_core::{AuthState, require_auth};

use crate::state::AppState;

pub mod categories;
pub mod products;

/// All protected routes, behind the auth gate.
pub fn routes(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(products::get_all_admin))
        .route("/admin/products/{id}", get(products::get_by_id_admin))
        .route("/admin/categories", get(categories::get_all_admin))
        .route("/admin/categories/{id}", get(categories::get_by_id_admin))
        .route(
            "/admin/categories/slug/{slug}",
            get(categories::get_by_slug_admin),
        )
        .layer(middleware::from_fn_with_state(auth, require_auth))
}
