//! Backend
//!
//! The hosted backend the storefront delegates to. Calls are made once and never retried; a
//! failure is returned to the caller to show to the shopper.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::{
    checkout::{OrderRequest, PlacedOrder},
    coupons::{CouponCode, CouponRecord},
    products::{ProductSnapshotRecord, ProductUuid},
};

/// Errors raised by backend calls.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("network request failed: {0}")]
    Network(String),

    /// The backend refused the request.
    #[error("request rejected by backend: {0}")]
    Rejected(String),

    /// The response could not be decoded.
    #[error("unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Looks up coupons by code.
#[automock]
#[async_trait]
pub trait CouponLookup: Send + Sync {
    /// Find the active coupon with the given normalized code, if any.
    async fn find_active_coupon(
        &self,
        code: &CouponCode,
    ) -> Result<Option<CouponRecord>, BackendError>;
}

/// Reads live stock and price for products.
#[automock]
#[async_trait]
pub trait CatalogSnapshots: Send + Sync {
    /// Current stock and price for each product the backend knows; unknown ids are left out.
    async fn product_snapshots(
        &self,
        products: &[ProductUuid],
    ) -> Result<FxHashMap<ProductUuid, ProductSnapshotRecord>, BackendError>;
}

/// Submits orders.
#[automock]
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order. The backend assigns the order number.
    async fn submit_order(&self, order: &OrderRequest) -> Result<PlacedOrder, BackendError>;
}
