//! Vendly Core - Shared service plumbing.
//!
//! This crate provides the pieces every Vendly service binary shares:
//! - `user-service` - Accounts, sign-in, customer directory (port 8080)
//! - `product-service` - Product catalog (port 8081)
//! - `order-service` - Orders and read-time aggregation (port 8082)
//!
//! # Architecture
//!
//! Each service validates the caller's bearer token independently against the
//! shared session store; there is no inter-service trust shortcut. The auth
//! gate, the session store, the peer-service HTTP client, and the response
//! envelope therefore live here rather than in any one service.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the platform role type
//! - [`error`] - The shared request-level error taxonomy
//! - [`envelope`] - The `{message, data, pagination}` response envelope
//! - [`session`] - Token-keyed session store (redis-backed, in-memory for tests)
//! - [`token`] - HS256 access token issue/verify
//! - [`policy`] - Role x route-prefix access policy table
//! - [`query`] - Shared sort direction for the paginated list surface
//! - [`auth`] - The auth gate: axum middleware plus the `Identity` extractor
//! - [`peer`] - Outbound HTTP client that forwards the caller's credential

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod envelope;
pub mod error;
pub mod peer;
pub mod policy;
pub mod query;
pub mod session;
pub mod token;
pub mod types;

pub use auth::{AuthState, BearerToken, Identity, require_auth};
pub use envelope::{Envelope, Pagination};
pub use error::ServiceError;
pub use peer::{PeerClient, PeerError};
pub use policy::{Access, RoutePolicy};
pub use query::SortDirection;
pub use session::{
    InMemorySessionStore, RedisSessionStore, SessionRecord, SessionStore, SessionStoreError,
};
pub use token::{Claims, JwtConfig};
pub use types::*;
