//! Service layer.

pub mod aggregator;

pub use aggregator::OrderAggregator;
