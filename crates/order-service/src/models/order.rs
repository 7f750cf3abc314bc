//! Order domain model.
//!
//! An [`Order`] as read from the local store carries raw line items: product
//! id and quantity only. Names, prices, and images live in the product
//! service and are stamped onto the line items at read time by the
//! aggregator; the buyer fields likewise come from the user service. Neither
//! is ever persisted here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vendly_core::{OrderId, OrderItemId, ProductId, SortDirection, UserId};

/// Lifecycle status of an order. Stored by name; unknown names pass through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(name: String) -> Self {
        match name.as_str() {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "shipped" => Self::Shipped,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => Self::Other(name),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order.
///
/// `product_id` and `quantity` are authoritative locally. `price`,
/// `product_name`, and `product_image` are view-only: always overwritten
/// from the product service response before reaching a caller.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub product_name: String,
    pub product_image: String,
}

/// An order as stored locally, with raw line items.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub order_code: String,
    pub buyer_id: UserId,
    pub order_date: String,
    pub order_time: String,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub shipping_type: String,
    pub shipping_fee: Decimal,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<OrderLineItem>,
}

/// An order enriched with buyer details. Read-time composite, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub buyer_name: String,
    pub buyer_email: String,
    pub buyer_phone: String,
    pub buyer_address: String,
}

/// Row shape for the admin order list.
#[derive(Debug, Clone, Serialize)]
pub struct OrderAdminRow {
    pub id: OrderId,
    pub order_code: String,
    pub product_image: String,
    pub customer_name: String,
    pub status: OrderStatus,
    pub payment_method: String,
    pub total_amount: Decimal,
}

impl From<&AggregatedOrder> for OrderAdminRow {
    fn from(aggregated: &AggregatedOrder) -> Self {
        Self {
            id: aggregated.order.id,
            order_code: aggregated.order.order_code.clone(),
            product_image: aggregated
                .order
                .line_items
                .first()
                .map(|item| item.product_image.clone())
                .unwrap_or_default(),
            customer_name: aggregated.buyer_name.clone(),
            status: aggregated.order.status.clone(),
            payment_method: aggregated.order.payment_method.clone(),
            total_amount: aggregated.order.total_amount,
        }
    }
}

/// Columns the order list may sort by. Anything else falls back to
/// `created_at`, so the column name can be spliced into SQL safely.
const SORTABLE_COLUMNS: &[&str] = &[
    "created_at",
    "order_date",
    "order_code",
    "status",
    "total_amount",
];

/// Normalized filter for the order list query.
#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub search: String,
    pub order_by: String,
    pub order_type: SortDirection,
    pub page: i64,
    pub limit: i64,
    pub status: Option<String>,
    pub buyer_id: Option<UserId>,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            order_by: "created_at".to_owned(),
            order_type: SortDirection::Desc,
            page: 1,
            limit: 10,
            status: None,
            buyer_id: None,
        }
    }
}

impl OrderFilter {
    /// Build a filter from raw query-string values, applying the platform
    /// defaults: page 1, limit 10, `created_at` descending.
    #[must_use]
    pub fn from_query(
        search: Option<String>,
        order_by: Option<String>,
        order_type: Option<String>,
        page: Option<i64>,
        limit: Option<i64>,
        status: Option<String>,
        buyer_id: Option<i64>,
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
            status: status.filter(|s| !s.is_empty()),
            buyer_id: buyer_id.map(UserId::new),
        }
    }

    /// Row offset for the page-limited fetch.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = OrderFilter::from_query(None, None, None, None, None, None, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Desc);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_non_positive_page_and_limit_fall_back() {
        let filter =
            OrderFilter::from_query(None, None, None, Some(0), Some(-5), None, None);
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
    }

    #[test]
    fn test_offset_reflects_page() {
        let filter =
            OrderFilter::from_query(None, None, None, Some(3), Some(10), None, None);
        assert_eq!(filter.offset(), 20);
    }

    #[test]
    fn test_unknown_sort_column_falls_back() {
        let filter = OrderFilter::from_query(
            None,
            Some("remarks; DROP TABLE orders".to_owned()),
            Some("asc".to_owned()),
            None,
            None,
            None,
            None,
        );
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Asc);
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(OrderStatus::from("pending".to_owned()), OrderStatus::Pending);
        assert_eq!(OrderStatus::Shipped.as_str(), "shipped");
        assert_eq!(
            OrderStatus::from("on_hold".to_owned()),
            OrderStatus::Other("on_hold".to_owned())
        );
    }

    #[test]
    fn test_admin_row_uses_first_line_item_image() {
        let order = Order {
            id: OrderId::new(1),
            order_code: "ORD-001".to_owned(),
            buyer_id: UserId::new(7),
            order_date: "2026-02-01".to_owned(),
            order_time: "10:30".to_owned(),
            status: OrderStatus::Pending,
            total_amount: Decimal::new(200, 0),
            payment_method: "transfer".to_owned(),
            shipping_type: "regular".to_owned(),
            shipping_fee: Decimal::new(10, 0),
            remarks: String::new(),
            created_at: Utc::now(),
            line_items: vec![
                OrderLineItem {
                    id: OrderItemId::new(1),
                    order_id: OrderId::new(1),
                    product_id: ProductId::new(3),
                    quantity: 2,
                    price: Decimal::new(100, 0),
                    product_name: "Widget".to_owned(),
                    product_image: "img.png".to_owned(),
                },
                OrderLineItem {
                    id: OrderItemId::new(2),
                    order_id: OrderId::new(1),
                    product_id: ProductId::new(4),
                    quantity: 1,
                    price: Decimal::new(50, 0),
                    product_name: "Gadget".to_owned(),
                    product_image: "other.png".to_owned(),
                },
            ],
        };
        let aggregated = AggregatedOrder {
            order,
            buyer_name: "Ann".to_owned(),
            buyer_email: "ann@example.com".to_owned(),
            buyer_phone: String::new(),
            buyer_address: String::new(),
        };

        let row = OrderAdminRow::from(&aggregated);
        assert_eq!(row.product_image, "img.png");
        assert_eq!(row.customer_name, "Ann");
    }
}
