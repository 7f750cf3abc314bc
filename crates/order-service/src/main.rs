//! Vendly order service.
//!
//! Serves the admin order endpoints on port 8082. Orders are stored locally
//! with bare line items; buyer and product detail is fetched from the user
//! and product services at read time and merged into the response.
//!
//! # Architecture
//!
//! - Axum web framework, JSON envelope responses
//! - `PostgreSQL` for order storage (`vendly_orders`)
//! - Redis-backed session validation shared with the other services
//! - Outbound `reqwest` calls to the user and product services, forwarding
//!   the caller's bearer token

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use secrecy::ExposeSecret;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod clients;
mod config;
mod db;
mod models;
mod routes;
mod services;
mod state;

use vendly_core::{AuthState, JwtConfig, PeerClient, RedisSessionStore, RoutePolicy};

use clients::{HttpBuyerDirectory, HttpProductCatalog};
use config::OrderConfig;
use db::PgOrderStore;
use services::OrderAggregator;
use state::AppState;

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = OrderConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vendly_order_service=info,tower_http=debug".into());

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

    // Shared session store; the same Redis backs every service's auth gate
    let sessions = RedisSessionStore::connect(config.redis_url.expose_secret())
        .await
        .expect("Failed to connect to Redis");
    tracing::info!("Session store connected");

    let jwt = JwtConfig::new(config.jwt_secret.clone(), config.jwt_issuer.clone(), 23);
    let auth = AuthState::new(Arc::new(sessions), jwt, RoutePolicy::platform_default());

    // Peer clients for the aggregation fan-out
    let peer_client = PeerClient::new(config.peer_timeout).expect("Failed to build HTTP client");
    let aggregator = OrderAggregator::new(
        Arc::new(PgOrderStore::new(pool.clone())),
        Arc::new(HttpBuyerDirectory::new(
            peer_client.clone(),
            config.user_service_url.clone(),
        )),
        Arc::new(HttpProductCatalog::new(
            peer_client,
            config.product_service_url.clone(),
        )),
    );

    let state = AppState::new(config.clone(), pool, aggregator);

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes(auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("order service listening on {}", addr);

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
