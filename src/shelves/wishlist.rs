//! Wishlist

use rusty_money::iso::Currency;

use crate::{
    products::ProductUuid,
    shelves::{AddOutcome, Shelf, ShelfEntry, ShelfError},
    storage::Storage,
};

/// Storage key holding the wishlist.
pub const WISHLIST_STORAGE_KEY: &str = "wishlist";

/// Products the shopper saved for later, oldest first.
#[derive(Debug)]
pub struct Wishlist<'a, S: Storage> {
    shelf: Shelf<'a, S>,
}

impl<'a, S: Storage> Wishlist<'a, S> {
    /// Open the wishlist persisted in `storage`.
    pub fn open(currency: &'a Currency, storage: S) -> Self {
        Self {
            shelf: Shelf::open(WISHLIST_STORAGE_KEY, currency, storage),
        }
    }

    /// Save a product.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Money`] if the entry is not priced in the wishlist currency.
    pub fn add(&mut self, entry: ShelfEntry<'a>) -> Result<AddOutcome, ShelfError> {
        self.shelf.check_currency(&entry)?;

        if self.shelf.contains(entry.product) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        self.shelf.push_back(entry);

        Ok(AddOutcome::Added)
    }

    /// Save the product if it is not saved yet, otherwise remove it. Returns whether the
    /// product is saved afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::Money`] if the entry is not priced in the wishlist currency.
    pub fn toggle(&mut self, entry: ShelfEntry<'a>) -> Result<bool, ShelfError> {
        if self.shelf.remove(entry.product) {
            return Ok(false);
        }

        self.add(entry)?;

        Ok(true)
    }

    /// Remove a product. Absent products are ignored.
    pub fn remove(&mut self, product: ProductUuid) {
        self.shelf.remove(product);
    }

    /// Remove every product.
    pub fn clear(&mut self) {
        self.shelf.clear();
    }

    /// Whether the product is saved.
    pub fn is_in_wishlist(&self, product: ProductUuid) -> bool {
        self.shelf.contains(product)
    }

    /// Saved products.
    pub fn entries(&self) -> &[ShelfEntry<'a>] {
        self.shelf.entries()
    }

    /// Number of saved products.
    pub fn len(&self) -> usize {
        self.shelf.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.shelf.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};
    use testresult::TestResult;

    use crate::{shelves::tests::entry, storage::MemoryStorage};

    use super::*;

    #[test]
    fn add_ignores_duplicates() -> TestResult {
        let mut wishlist = Wishlist::open(INR, MemoryStorage::new());
        let entry = entry("Silk Stole", 1_299);

        assert_eq!(wishlist.add(entry.clone())?, AddOutcome::Added);
        assert_eq!(wishlist.add(entry.clone())?, AddOutcome::AlreadyPresent);
        assert_eq!(wishlist.len(), 1);
        assert!(wishlist.is_in_wishlist(entry.product));

        Ok(())
    }

    #[test]
    fn toggle_adds_then_removes() -> TestResult {
        let mut wishlist = Wishlist::open(INR, MemoryStorage::new());
        let entry = entry("Silk Stole", 1_299);

        assert!(wishlist.toggle(entry.clone())?);
        assert!(!wishlist.toggle(entry.clone())?);
        assert!(wishlist.is_empty());

        Ok(())
    }

    #[test]
    fn keeps_insertion_order() -> TestResult {
        let mut wishlist = Wishlist::open(INR, MemoryStorage::new());
        let first = entry("First", 100);
        let second = entry("Second", 200);

        wishlist.add(first.clone())?;
        wishlist.add(second.clone())?;

        assert_eq!(wishlist.entries(), [first, second]);

        Ok(())
    }

    #[test]
    fn remove_and_clear_persist() -> TestResult {
        let storage = MemoryStorage::new();
        let mut wishlist = Wishlist::open(INR, storage.clone());
        let first = entry("First", 100);
        let second = entry("Second", 200);

        wishlist.add(first.clone())?;
        wishlist.add(second.clone())?;
        wishlist.remove(first.product);

        assert_eq!(Wishlist::open(INR, storage.clone()).entries(), [second]);

        wishlist.clear();

        assert!(Wishlist::open(INR, storage).is_empty());

        Ok(())
    }

    #[test]
    fn rejects_entry_in_other_currency() {
        let mut wishlist = Wishlist::open(INR, MemoryStorage::new());
        let mut foreign = entry("Foreign", 100);
        foreign.price = Money::from_minor(100, rusty_money::iso::USD);

        assert!(wishlist.add(foreign).is_err());
        assert!(wishlist.is_empty());
    }
}
