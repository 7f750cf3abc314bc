//! Order repository: the paginated, filtered read path over the local store.
//!
//! Returns orders with raw line items only; enrichment happens in the
//! aggregator. The count query and the page query share one predicate so the
//! reported totals match the page contents; no transactional snapshot is
//! taken, so a concurrent write between the two queries can still skew the
//! count (known caveat, matches the platform's other list endpoints).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use vendly_core::{OrderId, OrderItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderFilter, OrderLineItem, OrderStatus};

/// Read access to the order store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Paginated, filtered, sorted retrieval.
    ///
    /// Returns `(orders, total_count, total_pages)`; fails with
    /// [`RepositoryError::NotFound`] when the filtered result set is empty.
    async fn get_all(
        &self,
        filter: &OrderFilter,
    ) -> Result<(Vec<Order>, i64, i64), RepositoryError>;

    /// Single-order retrieval.
    async fn get_by_id(&self, order_id: OrderId) -> Result<Order, RepositoryError>;
}

/// `PostgreSQL` implementation of [`OrderStore`].
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn line_items_for(
        &self,
        order_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<OrderLineItem>>, RepositoryError> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, order_id, product_id, quantity \
             FROM order_items WHERE order_id = ANY($1) ORDER BY id",
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<OrderLineItem>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.order_id)
                .or_default()
                .push(row.into_line_item());
        }
        Ok(grouped)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn get_all(
        &self,
        filter: &OrderFilter,
    ) -> Result<(Vec<Order>, i64, i64), RepositoryError> {
        // Count first, against the same predicate as the page fetch.
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders");
        push_predicate(&mut count_query, filter);
        let total_count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let total_pages = total_pages(total_count, filter.limit);

        let mut page_query = QueryBuilder::<Postgres>::new(
            "SELECT id, order_code, buyer_id, order_date, order_time, status, \
             total_amount, payment_method, shipping_type, shipping_fee, remarks, created_at \
             FROM orders",
        );
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

        let rows: Vec<OrderRow> = page_query.build_query_as().fetch_all(&self.pool).await?;
        if rows.is_empty() {
            tracing::info!(search = %filter.search, page = filter.page, "no orders matched filter");
            return Err(RepositoryError::NotFound);
        }

        let order_ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut items = self.line_items_for(&order_ids).await?;

        let orders = rows
            .into_iter()
            .map(|row| {
                let line_items = items.remove(&row.id).unwrap_or_default();
                row.into_order(line_items)
            })
            .collect();

        Ok((orders, total_count, total_pages))
    }

    async fn get_by_id(&self, order_id: OrderId) -> Result<Order, RepositoryError> {
        let row: Option<OrderRow> = sqlx::query_as(
            "SELECT id, order_code, buyer_id, order_date, order_time, status, \
             total_amount, payment_method, shipping_type, shipping_fee, remarks, created_at \
             FROM orders WHERE id = $1",
        )
        .bind(order_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            tracing::info!(%order_id, "order not found");
            return Err(RepositoryError::NotFound);
        };

        let mut items = self.line_items_for(&[row.id]).await?;
        let line_items = items.remove(&row.id).unwrap_or_default();
        Ok(row.into_order(line_items))
    }
}

/// Shared filter predicate for the count and page queries.
fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    let pattern = format!("%{}%", filter.search);
    builder.push(" WHERE (order_code ILIKE ");
    builder.push_bind(pattern.clone());
    builder.push(" OR status ILIKE ");
    builder.push_bind(pattern);
    builder.push(")");

    if let Some(status) = &filter.status {
        builder.push(" AND status = ");
        builder.push_bind(status.clone());
    }
    if let Some(buyer_id) = filter.buyer_id {
        builder.push(" AND buyer_id = ");
        builder.push_bind(buyer_id.as_i64());
    }
}

const fn total_pages(total_count: i64, limit: i64) -> i64 {
    (total_count as u64).div_ceil(limit as u64) as i64
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_code: String,
    buyer_id: i64,
    order_date: NaiveDate,
    order_time: String,
    status: String,
    total_amount: Decimal,
    payment_method: String,
    shipping_type: String,
    shipping_fee: Decimal,
    remarks: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, line_items: Vec<OrderLineItem>) -> Order {
        Order {
            id: OrderId::new(self.id),
            order_code: self.order_code,
            buyer_id: UserId::new(self.buyer_id),
            order_date: self.order_date.format("%Y-%m-%d").to_string(),
            order_time: self.order_time,
            status: OrderStatus::from(self.status),
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            shipping_type: self.shipping_type,
            shipping_fee: self.shipping_fee,
            remarks: self.remarks,
            created_at: self.created_at,
            line_items,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i32,
}

impl ItemRow {
    fn into_line_item(self) -> OrderLineItem {
        OrderLineItem {
            id: OrderItemId::new(self.id),
            order_id: OrderId::new(self.order_id),
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
            // View-only fields; the aggregator overwrites these from the
            // product service before the order reaches a caller.
            price: Decimal::ZERO,
            product_name: String::new(),
            product_image: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn test_item_row_starts_with_placeholder_fields() {
        let item = ItemRow {
            id: 1,
            order_id: 9,
            product_id: 3,
            quantity: 2,
        }
        .into_line_item();

        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Decimal::ZERO);
        assert!(item.product_image.is_empty());
    }
}
