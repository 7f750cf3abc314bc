//! The order aggregation engine.
//!
//! Orders are stored without buyer or product detail; both are fetched at
//! read time from the user and product services under the caller's own
//! bearer token and merged into a composite view.
//!
//! # Failure policy
//!
//! Fail-fast, all-or-nothing: any single peer failure fails the whole call.
//! Callers never see a partially enriched order or a partial page. Within one
//! request the per-order and per-line-item calls run concurrently; the first
//! failure drops the outstanding sibling futures instead of awaiting them.
//!
//! Pagination counters come from the local store before enrichment starts
//! and are never affected by peer latency or failure.

use std::sync::Arc;

use futures::future::{try_join, try_join_all};

use vendly_core::{OrderId, PeerError, ServiceError};

use crate::clients::{BuyerDirectory, ProductCatalog};
use crate::db::OrderStore;
use crate::models::{AggregatedOrder, Order, OrderFilter};

/// Orchestrates the local fetch plus the buyer-info and product-info fan-out.
#[derive(Clone)]
pub struct OrderAggregator {
    store: Arc<dyn OrderStore>,
    buyers: Arc<dyn BuyerDirectory>,
    products: Arc<dyn ProductCatalog>,
}

impl OrderAggregator {
    #[must_use]
    pub fn new(
        store: Arc<dyn OrderStore>,
        buyers: Arc<dyn BuyerDirectory>,
        products: Arc<dyn ProductCatalog>,
    ) -> Self {
        Self {
            store,
            buyers,
            products,
        }
    }

    /// Paginated aggregated listing.
    ///
    /// Returns `(orders, total_count, total_pages)` with every order fully
    /// enriched, or a single error.
    ///
    /// # Errors
    ///
    /// `NotFound` when the filter matches nothing; `Upstream`/`Timeout`/
    /// `Decode` when any peer call fails; `Internal` on storage errors.
    pub async fn get_all(
        &self,
        filter: &OrderFilter,
        bearer_token: &str,
    ) -> Result<(Vec<AggregatedOrder>, i64, i64), ServiceError> {
        let (orders, total_count, total_pages) = self.store.get_all(filter).await?;

        let enriched = try_join_all(
            orders
                .into_iter()
                .map(|order| self.enrich(order, bearer_token)),
        )
        .await?;

        Ok((enriched, total_count, total_pages))
    }

    /// Single aggregated order.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::get_all`].
    pub async fn get_by_id(
        &self,
        order_id: OrderId,
        bearer_token: &str,
    ) -> Result<AggregatedOrder, ServiceError> {
        let order = self.store.get_by_id(order_id).await?;
        self.enrich(order, bearer_token).await
    }

    /// Enrich one order: one buyer-info call plus one product-info call per
    /// line item, all joined before the order is emitted.
    async fn enrich(
        &self,
        mut order: Order,
        bearer_token: &str,
    ) -> Result<AggregatedOrder, ServiceError> {
        let line_items = std::mem::take(&mut order.line_items);

        let buyer_future = self.buyers.buyer_info(order.buyer_id, bearer_token);
        let items_future = try_join_all(line_items.into_iter().map(|mut item| async move {
            let info = self
                .products
                .product_info(item.product_id, bearer_token)
                .await?;
            item.price = info.sale_price;
            item.product_name = info.product_name;
            item.product_image = info.product_image;
            Ok::<_, PeerError>(item)
        }));

        let (buyer, enriched_items) = try_join(buyer_future, items_future).await?;
        order.line_items = enriched_items;

        Ok(AggregatedOrder {
            order,
            buyer_name: buyer.name,
            buyer_email: buyer.email,
            buyer_phone: buyer.phone,
            buyer_address: buyer.address,
        })
    }
}
