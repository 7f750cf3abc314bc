//! Domain models for the user service.

pub mod user;

pub use user::{CustomerFilter, Profile, User};

pub use vendly_core::SortDirection;
