//! Wishlist insights
//!
//! Compares saved wishlist entries against live catalog snapshots to flag price drops and
//! stock problems. Display only; nothing here changes the wishlist.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    backend::{BackendError, CatalogSnapshots},
    money::amount_of,
    products::{ProductSnapshot, ProductUuid},
    shelves::ShelfEntry,
};

/// Stock at or below which a product is flagged as running low.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Something the shopper should know about a saved product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WishlistAlert<'a> {
    /// The price is lower than when the product was saved.
    PriceDrop {
        /// Price when saved
        was: Money<'a, Currency>,
        /// Current price
        now: Money<'a, Currency>,
    },

    /// No stock left.
    OutOfStock,

    /// Only a few units left.
    LowStock {
        /// Units in stock
        remaining: u32,
    },

    /// The catalog no longer lists the product.
    Unavailable,
}

/// Alerts for one saved product.
#[derive(Debug, Clone, PartialEq)]
pub struct WishlistInsight<'a> {
    /// Product the alerts are for
    pub product: ProductUuid,

    /// Alerts, never empty
    pub alerts: SmallVec<[WishlistAlert<'a>; 2]>,
}

/// Alerts for every entry that has any, in wishlist order.
pub fn wishlist_insights<'a>(
    entries: &[ShelfEntry<'a>],
    snapshots: &FxHashMap<ProductUuid, ProductSnapshot<'a>>,
) -> Vec<WishlistInsight<'a>> {
    entries
        .iter()
        .filter_map(|entry| {
            let alerts = alerts_for(entry, snapshots.get(&entry.product));

            (!alerts.is_empty()).then_some(WishlistInsight {
                product: entry.product,
                alerts,
            })
        })
        .collect()
}

/// Fetch live snapshots for `entries` and compute their alerts.
///
/// # Errors
///
/// Returns a [`BackendError`] if the snapshots could not be fetched.
pub async fn fetch_wishlist_insights<'a>(
    entries: &[ShelfEntry<'a>],
    catalog: &impl CatalogSnapshots,
    currency: &'a Currency,
) -> Result<Vec<WishlistInsight<'a>>, BackendError> {
    let products = entries
        .iter()
        .map(|entry| entry.product)
        .collect::<Vec<_>>();

    let snapshots = catalog
        .product_snapshots(&products)
        .await?
        .iter()
        .map(|(product, record)| (*product, ProductSnapshot::from_record(record, currency)))
        .collect::<FxHashMap<_, _>>();

    Ok(wishlist_insights(entries, &snapshots))
}

fn alerts_for<'a>(
    entry: &ShelfEntry<'a>,
    snapshot: Option<&ProductSnapshot<'a>>,
) -> SmallVec<[WishlistAlert<'a>; 2]> {
    let mut alerts = SmallVec::new();

    let Some(snapshot) = snapshot else {
        alerts.push(WishlistAlert::Unavailable);
        return alerts;
    };

    if snapshot.price.currency() == entry.price.currency()
        && amount_of(&snapshot.price) < amount_of(&entry.price)
    {
        alerts.push(WishlistAlert::PriceDrop {
            was: entry.price,
            now: snapshot.price,
        });
    }

    match snapshot.stock {
        0 => alerts.push(WishlistAlert::OutOfStock),
        remaining @ 1..=LOW_STOCK_THRESHOLD => alerts.push(WishlistAlert::LowStock { remaining }),
        _ => {}
    }

    alerts
}
