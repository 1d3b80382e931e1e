//! Shelves
//!
//! Ordered, persisted sets of product references kept beside the cart: the wishlist, the
//! compare list and recently viewed products. Each shelf holds at most one entry per product.

use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    money::{PriceError, ensure_currency, format_price, parse_price},
    products::{Product, ProductUuid},
    storage::{Storage, hydrate, write_through},
};

pub mod compare;
pub mod insights;
pub mod recently_viewed;
pub mod wishlist;

pub use compare::{COMPARE_CAPACITY, CompareList};
pub use insights::{
    LOW_STOCK_THRESHOLD, WishlistAlert, WishlistInsight, fetch_wishlist_insights,
    wishlist_insights,
};
pub use recently_viewed::{DEFAULT_RECENTLY_VIEWED_CAPACITY, RecentlyViewed};
pub use wishlist::Wishlist;

/// Errors related to shelf changes.
#[derive(Debug, Error, PartialEq)]
pub enum ShelfError {
    /// The entry is priced in a different currency from the shelf.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Result of adding a product to a shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was added.
    Added,

    /// The product was already on the shelf; nothing changed.
    AlreadyPresent,

    /// The shelf is at capacity; nothing changed.
    Full,
}

/// A product reference on a shelf, with the details needed to show it.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfEntry<'a> {
    /// Product id
    pub product: ProductUuid,

    /// Display title
    pub title: String,

    /// Price when the entry was saved
    pub price: Money<'a, Currency>,

    /// Reference list price
    pub mrp: Money<'a, Currency>,

    /// Image URL
    pub image: String,
}

impl<'a> ShelfEntry<'a> {
    /// Reference a catalog product.
    pub fn from_product(product: &Product<'a>) -> Self {
        Self {
            product: product.uuid,
            title: product.title.clone(),
            price: product.price,
            mrp: product.mrp,
            image: product.image.clone(),
        }
    }
}

/// Persisted form of a [`ShelfEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfEntryRecord {
    /// Product id
    pub product_id: ProductUuid,

    /// Display title
    pub title: String,

    /// Price, e.g. `"199.50 INR"`
    pub price: String,

    /// Reference list price
    pub mrp: String,

    /// Image URL
    #[serde(default)]
    pub image: String,
}

impl From<&ShelfEntry<'_>> for ShelfEntryRecord {
    fn from(entry: &ShelfEntry<'_>) -> Self {
        Self {
            product_id: entry.product,
            title: entry.title.clone(),
            price: format_price(&entry.price),
            mrp: format_price(&entry.mrp),
            image: entry.image.clone(),
        }
    }
}

impl TryFrom<ShelfEntryRecord> for ShelfEntry<'static> {
    type Error = PriceError;

    fn try_from(record: ShelfEntryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            product: record.product_id,
            title: record.title,
            price: parse_price(&record.price)?,
            mrp: parse_price(&record.mrp)?,
            image: record.image,
        })
    }
}

/// Ordered entries persisted under one storage key.
#[derive(Debug)]
pub(crate) struct Shelf<'a, S: Storage> {
    entries: Vec<ShelfEntry<'a>>,
    key: &'static str,
    currency: &'a Currency,
    storage: S,
}

impl<'a, S: Storage> Shelf<'a, S> {
    pub(crate) fn open(key: &'static str, currency: &'a Currency, storage: S) -> Self {
        let records: Vec<ShelfEntryRecord> = hydrate(&storage, key);

        let mut entries: Vec<ShelfEntry<'a>> = Vec::with_capacity(records.len());

        for record in records {
            match ShelfEntry::try_from(record) {
                Ok(entry) if entry.price.currency() != currency => {
                    warn!(
                        key,
                        product = %entry.product,
                        "dropping stored entry in another currency"
                    );
                }
                Ok(entry) if entries.iter().any(|kept| kept.product == entry.product) => {
                    warn!(key, product = %entry.product, "dropping duplicate stored entry");
                }
                Ok(entry) => entries.push(entry),
                Err(error) => warn!(key, %error, "dropping unreadable stored entry"),
            }
        }

        debug!(key, entries = entries.len(), "opened shelf");

        Self {
            entries,
            key,
            currency,
            storage,
        }
    }

    pub(crate) fn entries(&self) -> &[ShelfEntry<'a>] {
        &self.entries
    }

    pub(crate) fn contains(&self, product: ProductUuid) -> bool {
        self.position(product).is_some()
    }

    pub(crate) fn check_currency(&self, entry: &ShelfEntry<'a>) -> Result<(), ShelfError> {
        ensure_currency(self.currency, &entry.price)?;
        ensure_currency(self.currency, &entry.mrp)?;

        Ok(())
    }

    pub(crate) fn push_back(&mut self, entry: ShelfEntry<'a>) {
        debug!(key = self.key, product = %entry.product, "added shelf entry");

        self.entries.push(entry);
        self.persist();
    }

    /// Insert at the front, moving an existing entry for the same product, then keep at most
    /// `capacity` entries.
    pub(crate) fn push_front(&mut self, entry: ShelfEntry<'a>, capacity: usize) {
        if let Some(position) = self.position(entry.product) {
            self.entries.remove(position);
        }

        debug!(key = self.key, product = %entry.product, "moved shelf entry to front");

        self.entries.insert(0, entry);
        self.entries.truncate(capacity);
        self.persist();
    }

    /// Returns whether an entry was removed.
    pub(crate) fn remove(&mut self, product: ProductUuid) -> bool {
        let Some(position) = self.position(product) else {
            return false;
        };

        self.entries.remove(position);

        debug!(key = self.key, product = %product, "removed shelf entry");

        self.persist();

        true
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();

        debug!(key = self.key, "cleared shelf");

        self.persist();
    }

    /// Keep at most `capacity` entries, dropping from the back.
    pub(crate) fn truncate(&mut self, capacity: usize) {
        if self.entries.len() > capacity {
            self.entries.truncate(capacity);

            debug!(key = self.key, capacity, "trimmed shelf");

            self.persist();
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn position(&self, product: ProductUuid) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.product == product)
    }

    fn persist(&mut self) {
        let records = self
            .entries
            .iter()
            .map(ShelfEntryRecord::from)
            .collect::<Vec<_>>();

        write_through(&mut self.storage, self.key, &records);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use crate::storage::MemoryStorage;

    use super::*;

    pub(crate) fn entry(title: &str, major: i64) -> ShelfEntry<'static> {
        ShelfEntry {
            product: ProductUuid::now_v7(),
            title: title.to_string(),
            price: Money::from_minor(major * 100, INR),
            mrp: Money::from_minor(major * 100, INR),
            image: String::new(),
        }
    }

    #[test]
    fn push_front_moves_existing_entry_and_truncates() {
        let mut shelf = Shelf::open("test", INR, MemoryStorage::new());
        let first = entry("First", 100);
        let second = entry("Second", 200);
        let third = entry("Third", 300);

        shelf.push_front(first.clone(), 2);
        shelf.push_front(second.clone(), 2);
        shelf.push_front(first.clone(), 2);
        shelf.push_front(third.clone(), 2);

        assert_eq!(shelf.entries(), [third, first]);
    }

    #[test]
    fn remove_reports_whether_anything_changed() {
        let mut shelf = Shelf::open("test", INR, MemoryStorage::new());
        let entry = entry("Kept", 100);

        shelf.push_back(entry.clone());

        assert!(!shelf.remove(ProductUuid::now_v7()));
        assert!(shelf.remove(entry.product));
        assert_eq!(shelf.len(), 0);
    }

    #[test]
    fn entries_survive_reopening() {
        let storage = MemoryStorage::new();
        let mut shelf = Shelf::open("test", INR, storage.clone());
        let entry = entry("Saved", 499);

        shelf.push_back(entry.clone());

        assert_eq!(Shelf::open("test", INR, storage).entries(), [entry]);
    }

    #[test]
    fn open_drops_foreign_currency_and_duplicate_entries() -> TestResult {
        let mut storage = MemoryStorage::new();
        let kept = entry("Kept", 100);
        let mut foreign = entry("Foreign", 100);
        foreign.price = Money::from_minor(100, GBP);

        let records = vec![
            ShelfEntryRecord::from(&kept),
            ShelfEntryRecord::from(&kept),
            ShelfEntryRecord::from(&foreign),
        ];

        crate::storage::save_json(&mut storage, "test", &records)?;

        assert_eq!(Shelf::open("test", INR, storage).entries(), [kept]);

        Ok(())
    }

    #[test]
    fn check_currency_rejects_foreign_entries() {
        let shelf = Shelf::open("test", INR, MemoryStorage::new());
        let mut foreign = entry("Foreign", 100);
        foreign.mrp = Money::from_minor(100, GBP);

        assert_eq!(
            shelf.check_currency(&foreign),
            Err(ShelfError::Money(MoneyError::CurrencyMismatch {
                expected: INR.iso_alpha_code,
                actual: GBP.iso_alpha_code,
            }))
        );
    }
}
