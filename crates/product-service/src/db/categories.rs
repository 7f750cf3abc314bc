//! Category queries.
//!
//! Every select carries a correlated product count so the admin list and the
//! detail views report how many products sit in each category without a
//! second round trip.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use vendly_core::CategoryId;

use crate::db::RepositoryError;
use crate::models::{Category, CategoryFilter};

const SELECT_CATEGORY: &str =
    "SELECT c.id, c.parent_id, c.name, c.icon, c.slug, c.description, c.published, c.created_at, \
     (SELECT COUNT(*) FROM products p WHERE p.category_slug = c.slug) AS total_product \
     FROM categories c";

/// Storage seam for category reads.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Paginated category listing.
    ///
    /// Returns `(categories, total_count, total_pages)`.
    async fn get_all(
        &self,
        filter: &CategoryFilter,
    ) -> Result<(Vec<Category>, i64, i64), RepositoryError>;

    /// Single-category retrieval by ID.
    async fn get_by_id(&self, category_id: CategoryId) -> Result<Category, RepositoryError>;

    /// Single-category retrieval by slug.
    async fn get_by_slug(&self, slug: &str) -> Result<Category, RepositoryError>;
}

/// `PostgreSQL` implementation of [`CategoryStore`].
#[derive(Clone)]
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn get_all(
        &self,
        filter: &CategoryFilter,
    ) -> Result<(Vec<Category>, i64, i64), RepositoryError> {
        // Count first, against the same predicate as the page fetch.
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM categories c");
        push_predicate(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let total_pages = (total_count as u64).div_ceil(filter.limit as u64) as i64;

        let mut page_query = QueryBuilder::<Postgres>::new(SELECT_CATEGORY);
        push_predicate(&mut page_query, filter);
        // order_by is validated against a column whitelist at parse time
        page_query.push(format!(
            " ORDER BY c.{} {}",
            filter.order_by,
            filter.order_type.as_sql()
        ));
        page_query.push(" LIMIT ");
        page_query.push_bind(filter.limit);
        page_query.push(" OFFSET ");
        page_query.push_bind(filter.offset());

        let rows: Vec<CategoryRow> = page_query.build_query_as().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            tracing::info!(search = %filter.search, page = filter.page, "no categories matched filter");
            return Err(RepositoryError::NotFound);
        }

        let categories = rows.into_iter().map(CategoryRow::into_category).collect();
        Ok((categories, total_count, total_pages))
    }

    async fn get_by_id(&self, category_id: CategoryId) -> Result<Category, RepositoryError> {
        let row: Option<CategoryRow> =
            sqlx::query_as(&format!("{SELECT_CATEGORY} WHERE c.id = $1"))
                .bind(category_id.as_i64())
                .fetch_optional(&self.pool)
                .await?;

        row.map(CategoryRow::into_category)
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Category, RepositoryError> {
        let row: Option<CategoryRow> =
            sqlx::query_as(&format!("{SELECT_CATEGORY} WHERE c.slug = $1"))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;

        row.map(CategoryRow::into_category)
            .ok_or(RepositoryError::NotFound)
    }
}

/// Shared filter predicate for the count and page queries.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &CategoryFilter) {
    let pattern = format!("%{}%", filter.search);
    builder.push(" WHERE (c.name ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR c.slug ILIKE ");
    builder.push_bind(pattern);
    builder.push(")");
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    parent_id: Option<i64>,
    name: String,
    icon: String,
    slug: String,
    description: String,
    published: bool,
    created_at: DateTime<Utc>,
    total_product: i64,
}

impl CategoryRow {
    fn into_category(self) -> Category {
        Category {
            id: CategoryId::new(self.id),
            parent_id: self.parent_id.map(CategoryId::new),
            name: self.name,
            icon: self.icon,
            slug: self.slug,
            description: self.description,
            published: self.published,
            created_at: self.created_at,
            total_product: self.total_product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_maps_into_category() {
        let category = CategoryRow {
            id: 2,
            parent_id: Some(1),
            name: "Citrus".to_owned(),
            icon: "citrus.svg".to_owned(),
            slug: "citrus".to_owned(),
            description: String::new(),
            published: false,
            created_at: Utc::now(),
            total_product: 3,
        }
        .into_category();

        assert_eq!(category.id, CategoryId::new(2));
        assert_eq!(category.parent_id, Some(CategoryId::new(1)));
        assert_eq!(category.status_label(), "Unpublished");
        assert_eq!(category.total_product, 3);
    }
}
