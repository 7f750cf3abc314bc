//! Route registration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use vendly_core::{AuthState, require_auth};

use crate::state::AppState;

pub mod auth;
pub mod customers;
pub mod profile;

/// Public routes: no session required.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/auth/signin", post(auth::sign_in))
}

/// Protected routes, behind the auth gate.
pub fn protected_routes(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/auth/signout", post(auth::sign_out))
        .route("/profile", get(profile::get_profile))
        .route("/admin/customers", get(customers::get_all_admin))
        .route("/admin/customers/{id}", get(customers::get_by_id_admin))
        .layer(middleware::from_fn_with_state(auth, require_auth))
}
