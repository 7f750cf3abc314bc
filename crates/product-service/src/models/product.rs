//! Product domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use vendly_core::{ProductId, SortDirection};

/// A catalog product as stored locally. Variants reference their parent via
/// `parent_id`; listings only show parents.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub category_slug: String,
    pub parent_id: Option<ProductId>,
    pub name: String,
    pub image: String,
    pub description: String,
    pub reguler_price: Decimal,
    pub sale_price: Decimal,
    pub unit: String,
    pub weight: i32,
    pub stock: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Full product view, also the product-info contract the order service
/// consumes for aggregation; `product_name`, `product_image`, and
/// `sale_price` are load-bearing names.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub category_slug: String,
    pub product_name: String,
    pub product_image: String,
    pub description: String,
    pub reguler_price: Decimal,
    pub sale_price: Decimal,
    pub unit: String,
    pub weight: i32,
    pub stock: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            category_slug: product.category_slug.clone(),
            product_name: product.name.clone(),
            product_image: product.image.clone(),
            description: product.description.clone(),
            reguler_price: product.reguler_price,
            sale_price: product.sale_price,
            unit: product.unit.clone(),
            weight: product.weight,
            stock: product.stock,
            status: product.status.clone(),
            created_at: product.created_at,
        }
    }
}

/// Row shape for the admin product list.
#[derive(Debug, Clone, Serialize)]
pub struct ProductListRow {
    pub id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub category_slug: String,
    pub product_status: String,
    pub sale_price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Product> for ProductListRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            product_name: product.name.clone(),
            product_image: product.image.clone(),
            category_slug: product.category_slug.clone(),
            product_status: product.status.clone(),
            sale_price: product.sale_price,
            created_at: product.created_at,
        }
    }
}

/// Columns the product list may sort by. Anything else falls back to
/// `created_at`, so the column name can be spliced into SQL safely.
const SORTABLE_COLUMNS: &[&str] = &["created_at", "name", "sale_price", "stock"];

/// Normalized filter for the product list query.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    pub search: String,
    pub order_by: String,
    pub order_type: SortDirection,
    pub page: i64,
    pub limit: i64,
    pub category_slug: Option<String>,
    pub start_price: Option<Decimal>,
    pub end_price: Option<Decimal>,
    pub status: Option<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            order_by: "created_at".to_owned(),
            order_type: SortDirection::Desc,
            page: 1,
            limit: 10,
            category_slug: None,
            start_price: None,
            end_price: None,
            status: None,
        }
    }
}

impl ProductFilter {
    /// Build a filter from raw query-string values, applying the platform
    /// defaults: page 1, limit 10, `created_at` descending. Non-positive
    /// price bounds are ignored.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_query(
        search: Option<String>,
        order_by: Option<String>,
        order_type: Option<String>,
        page: Option<i64>,
        limit: Option<i64>,
        category_slug: Option<String>,
        start_price: Option<Decimal>,
        end_price: Option<Decimal>,
        status: Option<String>,
    ) -> Self {
        let order_by = order_by
            .filter(|column| SORTABLE_COLUMNS.contains(&column.as_str()))
            .unwrap_or_else(|| "created_at".to_owned());

        Self {
            search: search.unwrap_or_default(),
            order_by,
            order_type: SortDirection::parse(order_type.as_deref()),
            page: page.filter(|&p| p > 0).unwrap_or(1),
            limit: limit.filter(|&l| l > 0).unwrap_or(10),
            category_slug: category_slug.filter(|slug| !slug.is_empty()),
            start_price: start_price.filter(|&price| price > Decimal::ZERO),
            end_price: end_price.filter(|&price| price > Decimal::ZERO),
            status: status.filter(|s| !s.is_empty()),
        }
    }

    /// Row offset for the page-limited fetch.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}
