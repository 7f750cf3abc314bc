//! Service layer.

pub mod auth;

pub use auth::{SignInOutcome, SignInService};
