//! Domain models for the product service.

pub mod category;
pub mod product;

pub use category::{Category, CategoryDetail, CategoryFilter, CategoryListRow};
pub use product::{Product, ProductDetail, ProductFilter, ProductListRow};

pub use vendly_core::SortDirection;
