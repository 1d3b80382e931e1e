//! Compare list

use rusty_money::iso::Currency;

use crate::{
    products::ProductUuid,
    shelves::{AddOutcome, Shelf, ShelfEntry, ShelfError},
    storage::Storage,
};

/// Storage key holding the compare list.
pub const COMPARE_STORAGE_KEY: &str = "compare";

/// Most products that can be compared side by side.
pub const COMPARE_CAPACITY: usize = 3;

/// Products picked for side-by-side comparison.
#[derive(Debug)]
pub struct CompareList<'a, S: Storage> {
    shelf: Shelf<'a, S>,
}

impl<'a, S: Storage> CompareList<'a, S> {
    /// Open the compare list persisted in `storage`. Stored entries beyond capacity are
    /// dropped.
    pub fn open(currency: &'a Currency, storage: S) -> Self {
        let mut shelf = Shelf::open(COMPARE_STORAGE_KEY, currency, storage);

        shelf.truncate(COMPARE_CAPACITY);

        Self { shelf }
    }

    /// Add a product to compare.
    ///
    /// Returns [`AddOutcome::Full`] without changing anything when the list already holds
    /// [`COMPARE_CAPACITY`] products.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Money`] if the entry is not priced in the list currency.
    pub fn add(&mut self, entry: ShelfEntry<'a>) -> Result<AddOutcome, ShelfError> {
        self.shelf.check_currency(&entry)?;

        if self.shelf.contains(entry.product) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        if self.shelf.len() >= COMPARE_CAPACITY {
            return Ok(AddOutcome::Full);
        }

        self.shelf.push_back(entry);

        Ok(AddOutcome::Added)
    }

    /// Remove a product. Absent products are ignored.
    pub fn remove(&mut self, product: ProductUuid) {
        self.shelf.remove(product);
    }

    /// Remove every product.
    pub fn clear(&mut self) {
        self.shelf.clear();
    }

    /// Whether the product is being compared.
    pub fn is_in_compare(&self, product: ProductUuid) -> bool {
        self.shelf.contains(product)
    }

    /// Products being compared.
    pub fn entries(&self) -> &[ShelfEntry<'a>] {
        self.shelf.entries()
    }

    /// Whether no more products can be added.
    pub fn is_full(&self) -> bool {
        self.shelf.len() >= COMPARE_CAPACITY
    }
}
