//! Domain models for the order service.

pub mod order;

pub use order::{AggregatedOrder, Order, OrderAdminRow, OrderFilter, OrderLineItem, OrderStatus};

pub use vendly_core::SortDirection;
