//! Recently viewed

use rusty_money::iso::Currency;

use crate::{
    products::ProductUuid,
    shelves::{Shelf, ShelfEntry, ShelfError},
    storage::Storage,
};

/// Storage key holding recently viewed products.
pub const RECENTLY_VIEWED_STORAGE_KEY: &str = "recently_viewed";

/// Products kept when no capacity is configured.
pub const DEFAULT_RECENTLY_VIEWED_CAPACITY: usize = 10;

/// Products the shopper looked at, newest first.
#[derive(Debug)]
pub struct RecentlyViewed<'a, S: Storage> {
    shelf: Shelf<'a, S>,
    capacity: usize,
}

impl<'a, S: Storage> RecentlyViewed<'a, S> {
    /// Open the history persisted in `storage`, keeping at most `capacity` products.
    pub fn open(currency: &'a Currency, storage: S, capacity: usize) -> Self {
        let mut shelf = Shelf::open(RECENTLY_VIEWED_STORAGE_KEY, currency, storage);

        shelf.truncate(capacity);

        Self { shelf, capacity }
    }

    /// Record a product view. A product viewed again moves to the front; the oldest product
    /// beyond capacity is forgotten.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Money`] if the entry is not priced in the history currency.
    pub fn record(&mut self, entry: ShelfEntry<'a>) -> Result<(), ShelfError> {
        self.shelf.check_currency(&entry)?;
        self.shelf.push_front(entry, self.capacity);

        Ok(())
    }

    /// Forget a product. Absent products are ignored.
    pub fn remove(&mut self, product: ProductUuid) {
        self.shelf.remove(product);
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.shelf.clear();
    }

    /// Whether the product was viewed recently.
    pub fn contains(&self, product: ProductUuid) -> bool {
        self.shelf.contains(product)
    }

    /// Viewed products, newest first.
    pub fn entries(&self) -> &[ShelfEntry<'a>] {
        self.shelf.entries()
    }

    /// Most products kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
