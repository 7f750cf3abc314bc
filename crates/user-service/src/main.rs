//! Vendly user service.
//!
//! Serves sign-in, the caller profile, and the admin customer directory on
//! port 8080. Sign-in writes the session record every other service's auth
//! gate reads; the customer detail endpoint is the buyer-info source for
//! order aggregation.
//!
//! # Architecture
//!
//! - Axum web framework, JSON envelope responses
//! - `PostgreSQL` for accounts (`vendly_users`)
//! - Redis-backed sessions shared with the other services
//! - bcrypt password verification, HS256 access tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use secrecy::ExposeSecret;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod models;
mod routes;
mod services;
mod state;

use vendly_core::{AuthState, JwtConfig, RedisSessionStore, RoutePolicy};

use config::UserConfig;
use db::PgUserStore;
use services::SignInService;
use state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = UserConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vendly_user_service=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: sqlx migrate run

    // Shared session store; sign-in writes it, every auth gate reads it
    let sessions = Arc::new(
        RedisSessionStore::connect(config.redis_url.expose_secret())
            .await
            .expect("Failed to connect to Redis"),
    );
    tracing::info!("Session store connected");

    let jwt = JwtConfig::new(
        config.jwt_secret.clone(),
        config.jwt_issuer.clone(),
        i64::try_from(config.session_ttl_hours).expect("session TTL out of range"),
    );
    let auth = AuthState::new(
        Arc::clone(&sessions) as _,
        jwt.clone(),
        RoutePolicy::platform_default(),
    );

    let users = Arc::new(PgUserStore::new(pool.clone()));
    let sign_in = SignInService::new(
        Arc::clone(&users) as _,
        sessions,
        jwt,
        config.session_ttl(),
    );

    let state = AppState::new(config.clone(), pool, users, sign_in);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::public_routes())
        .merge(routes::protected_routes(auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("user service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
