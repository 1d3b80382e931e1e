//! Cart
//!
//! The session's ordered cart lines with derived item count and subtotal. Every change is
//! written through to [`Storage`].

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    money::{ensure_currency, money_from_amount, round_currency},
    storage::{Storage, hydrate, write_through},
};

pub mod lines;

pub use lines::{CartLine, CartLineRecord, LineUuid, NewCartLine};

/// Storage key holding the persisted cart lines.
pub const CART_STORAGE_KEY: &str = "cart";

/// Errors related to cart changes.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// The line is priced in a different currency from the cart.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Cart
#[derive(Debug)]
pub struct CartStore<'a, S: Storage> {
    lines: Vec<CartLine<'a>>,
    currency: &'a Currency,
    storage: S,
}

impl<'a, S: Storage> CartStore<'a, S> {
    /// Create an empty cart that persists into `storage`.
    pub fn new(currency: &'a Currency, storage: S) -> Self {
        Self {
            lines: Vec::new(),
            currency,
            storage,
        }
    }

    /// Open the cart persisted in `storage`.
    ///
    /// Unreadable state, and lines priced in another currency, are dropped.
    pub fn open(currency: &'a Currency, storage: S) -> Self {
        let records: Vec<CartLineRecord> = hydrate(&storage, CART_STORAGE_KEY);

        let lines = records
            .into_iter()
            .filter_map(|record| match CartLine::try_from(record) {
                Ok(line) if line.price().currency() == currency => Some(line),
                Ok(line) => {
                    warn!(
                        line = %line.uuid(),
                        currency = line.price().currency().iso_alpha_code,
                        "dropping stored cart line in another currency"
                    );
                    None
                }
                Err(error) => {
                    warn!(%error, "dropping unreadable stored cart line");
                    None
                }
            })
            .collect::<Vec<_>>();

        debug!(lines = lines.len(), "opened cart");

        Self {
            lines,
            currency,
            storage,
        }
    }

    /// Add a product to the cart.
    ///
    /// A line for the same product and variant absorbs the quantity instead of a second line
    /// being created. Stock is not checked here.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Money`] if the line is not priced in the cart currency.
    pub fn add_item(&mut self, line: NewCartLine<'a>) -> Result<LineUuid, CartError> {
        ensure_currency(self.currency, &line.price)?;
        ensure_currency(self.currency, &line.mrp)?;

        let variant = lines::normalize_variant(line.variant.clone());

        let uuid = if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|existing| existing.matches(line.product, variant.as_deref()))
        {
            existing.merge(line);

            debug!(line = %existing.uuid(), quantity = existing.quantity(), "merged cart line");

            existing.uuid()
        } else {
            let new = CartLine::from_new(line);
            let uuid = new.uuid();

            debug!(line = %uuid, quantity = new.quantity(), "added cart line");

            self.lines.push(new);

            uuid
        };

        self.persist();

        Ok(uuid)
    }

    /// Remove a line. Unknown ids are ignored.
    pub fn remove_item(&mut self, uuid: LineUuid) {
        let before = self.lines.len();

        self.lines.retain(|line| line.uuid() != uuid);

        if self.lines.len() != before {
            debug!(line = %uuid, "removed cart line");

            self.persist();
        }
    }

    /// Change a line's quantity, clamped to at least one and at most its stock hint.
    /// Unknown ids are ignored.
    pub fn update_quantity(&mut self, uuid: LineUuid, quantity: u32) {
        let Some(line) = self.lines.iter_mut().find(|line| line.uuid() == uuid) else {
            return;
        };

        line.set_quantity(quantity);

        debug!(line = %uuid, requested = quantity, quantity = line.quantity(), "updated cart line");

        self.persist();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();

        debug!("cleared cart");

        self.persist();
    }

    /// Lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Look up a line.
    pub fn get(&self, uuid: LineUuid) -> Option<&CartLine<'a>> {
        self.lines.iter().find(|line| line.uuid() == uuid)
    }

    /// Total units across all lines (not the number of lines).
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    /// Sum of price times quantity, rounded once to whole currency units.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        let total = self
            .lines
            .iter()
            .map(CartLine::line_total)
            .sum::<Decimal>();

        money_from_amount(round_currency(total), self.currency)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Currency every line is priced in.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    fn persist(&mut self) {
        let records = self
            .lines
            .iter()
            .map(CartLineRecord::from)
            .collect::<Vec<_>>();

        write_through(&mut self.storage, CART_STORAGE_KEY, &records);
    }
}
