//! Admin product route handlers.
//!
//! The detail endpoint doubles as the product-info contract the order
//! service consumes during aggregation.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use vendly_core::{Envelope, Identity, Pagination, ProductId, ServiceError};

use crate::models::{ProductDetail, ProductFilter, ProductListRow};
use crate::state::AppState;

/// Query parameters for the admin product list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub order_type: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category_slug: Option<String>,
    pub start_price: Option<Decimal>,
    pub end_price: Option<Decimal>,
    pub status: Option<String>,
}

impl ProductListQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter::from_query(
            self.search,
            self.order_by,
            self.order_type,
            self.page,
            self.per_page,
            self.category_slug,
            self.start_price,
            self.end_price,
            self.status,
        )
    }
}

/// `GET /admin/products` - paginated product listing.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_all_admin(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Envelope<Vec<ProductListRow>>>, ServiceError> {
    let filter = query.into_filter();

    let (products, total_count, total_pages) = state.products().get_all(&filter).await?;

    let rows: Vec<ProductListRow> = products.iter().map(ProductListRow::from).collect();
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

/// `GET /admin/products/{id}` - single product, the product-info contract.
#[instrument(skip(state, identity), fields(caller = %identity.user_id))]
pub async fn get_by_id_admin(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Envelope<ProductDetail>>, ServiceError> {
    let product = state.products().get_by_id(ProductId::new(id)).await?;
    Ok(Json(Envelope::ok("success", ProductDetail::from(&product))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_uses_camel_case_parameter_names() {
        let query: ProductListQuery = serde_json::from_str(
            r#"{"search":"widget","categorySlug":"fruit","startPrice":10,"endPrice":200,"perPage":25}"#,
        )
        .expect("deserialize");
        let filter = query.into_filter();
        assert_eq!(filter.search, "widget");
        assert_eq!(filter.category_slug.as_deref(), Some("fruit"));
        assert_eq!(filter.start_price, Some(Decimal::new(10, 0)));
        assert_eq!(filter.end_price, Some(Decimal::new(200, 0)));
        assert_eq!(filter.limit, 25);
    }
}
