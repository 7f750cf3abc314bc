//! Admin order route handlers.
//!
//! Both handlers sit behind the auth gate; the gate attaches the caller's
//! [`Identity`] and raw bearer token, and the token is forwarded verbatim to
//! the peer services during aggregation.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use vendly_core::{BearerToken, Envelope, Identity, OrderId, Pagination, ServiceError};

use crate::models::{AggregatedOrder, OrderAdminRow, OrderFilter};
use crate::state::AppState;

/// Query parameters for the admin order list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<String>,
}

impl OrderListQuery {
    fn into_filter(self) -> OrderFilter {
        OrderFilter::from_query(
            self.search,
            self.order_by,
            self.order_type,
            self.page,
            self.per_page,
            self.status,
            None,
        )
    }
}

/// `GET /admin/orders` - paginated aggregated order list.
#[instrument(skip(state, token, identity), fields(caller = %identity.user_id))]
pub async fn get_all_admin(
    State(state): State<AppState>,
    identity: Identity,
    token: BearerToken,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Envelope<Vec<OrderAdminRow>>>, ServiceError> {
    let filter = query.into_filter();

    let (orders, total_count, total_pages) = state
        .aggregator()
        .get_all(&filter, token.as_str())
        .await?;

    let rows: Vec<OrderAdminRow> = orders.iter().map(OrderAdminRow::from).collect();
    Ok(Json(Envelope::ok_paginated(
        "success",
        rows,
        Pagination {
            page: filter.page,
            total_count,
            per_page: filter.limit,
            total_page: total_pages,
        },
    )))
}

/// `GET /admin/orders/{id}` - single aggregated order.
#[instrument(skip(state, token, identity), fields(caller = %identity.user_id))]
pub async fn get_by_id_admin(
    State(state): State<AppState>,
    identity: Identity,
    token: BearerToken,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<AggregatedOrder>>, ServiceError> {
    let aggregated = state
        .aggregator()
        .get_by_id(OrderId::new(id), token.as_str())
        .await?;

    Ok(Json(Envelope::ok("success", aggregated)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;

    #[test]
    fn test_query_defaults_match_platform_contract() {
        let query: OrderListQuery = serde_json::from_str("{}").expect("deserialize");
        let filter = query.into_filter();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert_eq!(filter.order_by, "created_at");
        assert_eq!(filter.order_type, SortDirection::Desc);
    }

    #[test]
    fn test_query_uses_camel_case_parameter_names() {
        let query: OrderListQuery = serde_json::from_str(
            r#"{"search":"ORD","orderBy":"order_date","orderType":"asc","page":2,"perPage":25,"status":"pending"}"#,
        )
        .expect("deserialize");
        let filter = query.into_filter();
        assert_eq!(filter.search, "ORD");
        assert_eq!(filter.order_by, "order_date");
        assert_eq!(filter.order_type, SortDirection::Asc);
        assert_eq!(filter.page, 2);
        assert_eq!(filter.limit, 25);
        assert_eq!(filter.status.as_deref(), Some("pending"));
    }
}
