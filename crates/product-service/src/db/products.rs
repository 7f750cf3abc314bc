//! Product catalog queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use vendly_core::ProductId;

use crate::db::RepositoryError;
use crate::models::{Product, ProductFilter};

const SELECT_PRODUCT: &str = "SELECT id, category_slug, parent_id, name, image, description, \
     reguler_price, sale_price, unit, weight, stock, status, created_at FROM products";

/// Storage seam for the catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Paginated listing of parent products.
    ///
    /// Returns `(products, total_count, total_pages)`.
    async fn get_all(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, i64, i64), RepositoryError>;

    /// Single-product retrieval.
    async fn get_by_id(&self, product_id: ProductId) -> Result<Product, RepositoryError>;
}

/// `PostgreSQL` implementation of [`ProductStore`].
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn get_all(
        &self,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, i64, i64), RepositoryError> {
        // Count first, against the same predicate as the page fetch.
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_predicate(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let total_pages = (total_count as u64).div_ceil(filter.limit as u64) as i64;

        let mut page_query = QueryBuilder::<Postgres>::new(SELECT_PRODUCT);
        push_predicate(&mut page_query, filter);
        // order_by is validated against a column whitelist at parse time
        page_query.push(format!(
            " ORDER BY {} {}",
            filter.order_by,
            filter.order_type.as_sql()
        ));
        page_query.push(" LIMIT ");
        page_query.push_bind(filter.limit);
        page_query.push(" OFFSET ");
        page_query.push_bind(filter.offset());

        let rows: Vec<ProductRow> = page_query.build_query_as().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            tracing::info!(search = %filter.search, page = filter.page, "no products matched filter");
            return Err(RepositoryError::NotFound);
        }

        let products = rows.into_iter().map(ProductRow::into_product).collect();
        Ok((products, total_count, total_pages))
    }

    async fn get_by_id(&self, product_id: ProductId) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE id = $1"))
            .bind(product_id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.map(ProductRow::into_product)
            .ok_or(RepositoryError::NotFound)
    }
}

/// Shared filter predicate for the count and page queries. Listings only
/// show parent products in the requested status (`active` by default).
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    let pattern = format!("%{}%", filter.search);
    builder.push(" WHERE parent_id IS NULL AND status = ");
    builder.push_bind(filter.status.clone().unwrap_or_else(|| "active".to_owned()));
    builder.push(" AND (name ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR description ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR category_slug ILIKE ");
    builder.push_bind(pattern);
    builder.push(")");

    if let Some(slug) = &filter.category_slug {
        builder.push(" AND category_slug = ");
        builder.push_bind(slug.clone());
    }
    if let Some(start_price) = filter.start_price {
        builder.push(" AND sale_price >= ");
        builder.push_bind(start_price);
    }
    if let Some(end_price) = filter.end_price {
        builder.push(" AND sale_price <= ");
        builder.push_bind(end_price);
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    category_slug: String,
    parent_id: Option<i64>,
    name: String,
    image: String,
    description: String,
    reguler_price: Decimal,
    sale_price: Decimal,
    unit: String,
    weight: i32,
    stock: i32,
    status: String,
    created_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            category_slug: self.category_slug,
            parent_id: self.parent_id.map(ProductId::new),
            name: self.name,
            image: self.image,
            description: self.description,
            reguler_price: self.reguler_price,
            sale_price: self.sale_price,
            unit: self.unit,
            weight: self.weight,
            stock: self.stock,
            status: self.status,
            created_at: self.created_at,
        }
    }
}
