//! Typed clients for the peer services the aggregator calls.
//!
//! Each trait has one HTTP implementation backed by the shared
//! [`PeerClient`]; the traits exist so the aggregator can be exercised with
//! in-memory fakes. Both implementations forward the caller's bearer token;
//! the peer re-validates it against the same session store.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

use vendly_core::{PeerClient, PeerError, ProductId, UserId};

/// Buyer details as served by the user service's customer endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BuyerInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Product details as served by the product service's detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInfo {
    pub product_name: String,
    pub product_image: String,
    pub sale_price: Decimal,
}

/// Buyer lookups against the user service.
#[async_trait]
pub trait BuyerDirectory: Send + Sync {
    async fn buyer_info(
        &self,
        buyer_id: UserId,
        bearer_token: &str,
    ) -> Result<BuyerInfo, PeerError>;
}

/// Product lookups against the product service.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_info(
        &self,
        product_id: ProductId,
        bearer_token: &str,
    ) -> Result<ProductInfo, PeerError>;
}

/// HTTP implementation of [`BuyerDirectory`].
#[derive(Clone)]
pub struct HttpBuyerDirectory {
    client: PeerClient,
    base_url: String,
}

impl HttpBuyerDirectory {
    #[must_use]
    pub fn new(client: PeerClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BuyerDirectory for HttpBuyerDirectory {
    async fn buyer_info(
        &self,
        buyer_id: UserId,
        bearer_token: &str,
    ) -> Result<BuyerInfo, PeerError> {
        let url = format!("{}/admin/customers/{buyer_id}", self.base_url);
        self.client.get_enveloped(&url, bearer_token).await
    }
}

/// HTTP implementation of [`ProductCatalog`].
#[derive(Clone)]
pub struct HttpProductCatalog {
    client: PeerClient,
    base_url: String,
}

impl HttpProductCatalog {
    #[must_use]
    pub fn new(client: PeerClient, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProductCatalog for HttpProductCatalog {
    async fn product_info(
        &self,
        product_id: ProductId,
        bearer_token: &str,
    ) -> Result<ProductInfo, PeerError> {
        let url = format!("{}/admin/products/{product_id}", self.base_url);
        self.client.get_enveloped(&url, bearer_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buyer_info_decodes_with_missing_optionals() {
        let info: BuyerInfo =
            serde_json::from_str(r#"{"name":"Ann","email":"ann@example.com"}"#)
                .expect("deserialize");
        assert_eq!(info.name, "Ann");
        assert!(info.phone.is_empty());
    }

    #[test]
    fn test_product_info_decodes_numeric_price() {
        let info: ProductInfo = serde_json::from_str(
            r#"{"product_name":"Widget","product_image":"img.png","sale_price":100}"#,
        )
        .expect("deserialize");
        assert_eq!(info.product_image, "img.png");
        assert_eq!(info.sale_price, Decimal::new(100, 0));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let info: BuyerInfo = serde_json::from_str(
            r#"{"id":7,"name":"Ann","email":"a@b.c","phone":"555","address":"1 Main","photo":"x.png"}"#,
        )
        .expect("deserialize");
        assert_eq!(info.address, "1 Main");
    }
}
