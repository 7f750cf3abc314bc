//! Shared type definitions.

pub mod id;
pub mod role;

pub use id::{CategoryId, OrderId, OrderItemId, ProductId, UserId};
pub use role::Role;
