//! Cart Lines

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

use crate::{
    money::{PriceError, amount_of, format_price, mrp_savings, parse_price},
    products::{Product, ProductUuid},
};

pub use crate::uuids::LineUuid;

/// A product (and variant) in the cart with its quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    uuid: LineUuid,
    product: ProductUuid,
    title: String,
    price: Money<'a, Currency>,
    mrp: Money<'a, Currency>,
    quantity: u32,
    image: String,
    variant: Option<String>,
    stock_hint: Option<u32>,
}

impl<'a> CartLine<'a> {
    pub(crate) fn from_new(line: NewCartLine<'a>) -> Self {
        Self {
            uuid: LineUuid::now_v7(),
            product: line.product,
            title: line.title,
            price: line.price,
            mrp: line.mrp,
            quantity: line.quantity.max(1),
            image: line.image,
            variant: normalize_variant(line.variant),
            stock_hint: line.stock_hint,
        }
    }

    /// Local line id
    pub fn uuid(&self) -> LineUuid {
        self.uuid
    }

    /// Product this line is for
    pub fn product(&self) -> ProductUuid {
        self.product
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current unit price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Reference list price
    pub fn mrp(&self) -> &Money<'a, Currency> {
        &self.mrp
    }

    /// Units of this product+variant, always at least one
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Image URL
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Variant description, e.g. `"Size M / Blue"`
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Stock known when the line was last added, if any
    pub fn stock_hint(&self) -> Option<u32> {
        self.stock_hint
    }

    /// Unit price times quantity, before any rounding.
    pub fn line_total(&self) -> Decimal {
        amount_of(&self.price) * Decimal::from(self.quantity)
    }

    /// Discount against MRP, for display.
    pub fn mrp_savings(&self) -> Percentage {
        mrp_savings(&self.price, &self.mrp)
    }

    pub(crate) fn matches(&self, product: ProductUuid, variant: Option<&str>) -> bool {
        self.product == product && self.variant.as_deref() == variant
    }

    /// Fold a repeated addition of the same product+variant into this line.
    pub(crate) fn merge(&mut self, line: NewCartLine<'a>) {
        self.quantity = self.quantity.saturating_add(line.quantity.max(1));
        self.title = line.title;
        self.price = line.price;
        self.mrp = line.mrp;
        self.image = line.image;

        if line.stock_hint.is_some() {
            self.stock_hint = line.stock_hint;
        }
    }

    /// Set the quantity, clamped to `[1, stock_hint]`.
    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        let quantity = quantity.max(1);

        self.quantity = match self.stock_hint {
            Some(stock) => quantity.min(stock.max(1)),
            None => quantity,
        };
    }
}

/// Input for adding a product to the cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine<'a> {
    /// Product id
    pub product: ProductUuid,

    /// Display title
    pub title: String,

    /// Current unit price
    pub price: Money<'a, Currency>,

    /// Reference list price
    pub mrp: Money<'a, Currency>,

    /// Units to add; zero is treated as one
    pub quantity: u32,

    /// Image URL
    pub image: String,

    /// Variant description
    pub variant: Option<String>,

    /// Stock known at the time of adding, used to clamp quantity updates
    pub stock_hint: Option<u32>,
}

impl<'a> NewCartLine<'a> {
    /// Build a cart addition from a catalog product.
    pub fn from_product(product: &Product<'a>, quantity: u32, variant: Option<String>) -> Self {
        Self {
            product: product.uuid,
            title: product.title.clone(),
            price: product.price,
            mrp: product.mrp,
            quantity,
            image: product.image.clone(),
            variant,
            stock_hint: Some(product.stock),
        }
    }
}

/// Persisted form of a [`CartLine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineRecord {
    /// Local line id
    pub id: LineUuid,

    /// Product id
    pub product_id: ProductUuid,

    /// Display title
    pub title: String,

    /// Unit price, e.g. `"199.50 INR"`
    pub price: String,

    /// Reference list price
    pub mrp: String,

    /// Units
    pub quantity: u32,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Variant description
    #[serde(default)]
    pub variant: Option<String>,

    /// Stock hint
    #[serde(default)]
    pub stock_hint: Option<u32>,
}

impl From<&CartLine<'_>> for CartLineRecord {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            id: line.uuid,
            product_id: line.product,
            title: line.title.clone(),
            price: format_price(&line.price),
            mrp: format_price(&line.mrp),
            quantity: line.quantity,
            image: line.image.clone(),
            variant: line.variant.clone(),
            stock_hint: line.stock_hint,
        }
    }
}

impl TryFrom<CartLineRecord> for CartLine<'static> {
    type Error = PriceError;

    fn try_from(record: CartLineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: record.id,
            product: record.product_id,
            title: record.title,
            price: parse_price(&record.price)?,
            mrp: parse_price(&record.mrp)?,
            quantity: record.quantity.max(1),
            image: record.image,
            variant: normalize_variant(record.variant),
            stock_hint: record.stock_hint,
        })
    }
}

/// Blank variants are the same as no variant.
pub(crate) fn normalize_variant(variant: Option<String>) -> Option<String> {
    variant
        .map(|variant| variant.trim().to_string())
        .filter(|variant| !variant.is_empty())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn new_line(quantity: u32, stock_hint: Option<u32>) -> NewCartLine<'static> {
        NewCartLine {
            product: ProductUuid::now_v7(),
            title: "Linen Shirt".to_string(),
            price: Money::from_minor(124_950, INR),
            mrp: Money::from_minor(199_900, INR),
            quantity,
            image: String::new(),
            variant: Some(" M ".to_string()),
            stock_hint,
        }
    }

    #[test]
    fn zero_quantity_is_stored_as_one() {
        let line = CartLine::from_new(new_line(0, None));

        assert_eq!(line.quantity(), 1);
    }

    #[test]
    fn variant_is_trimmed_and_blank_is_none() {
        assert_eq!(CartLine::from_new(new_line(1, None)).variant(), Some("M"));
        assert_eq!(normalize_variant(Some("   ".to_string())), None);
    }

    #[test]
    fn line_total_is_unrounded() {
        let line = CartLine::from_new(new_line(3, None));

        assert_eq!(line.line_total(), Decimal::new(374_850, 2));
    }

    #[test]
    fn set_quantity_clamps_to_stock_hint() {
        let mut line = CartLine::from_new(new_line(1, Some(4)));

        line.set_quantity(10);
        assert_eq!(line.quantity(), 4);

        line.set_quantity(0);
        assert_eq!(line.quantity(), 1);
    }

    #[test]
    fn set_quantity_without_stock_hint_only_clamps_below() {
        let mut line = CartLine::from_new(new_line(1, None));

        line.set_quantity(250);

        assert_eq!(line.quantity(), 250);
    }

    #[test]
    fn merge_sums_quantity_and_refreshes_snapshot() {
        let mut line = CartLine::from_new(new_line(1, Some(2)));
        let mut again = new_line(2, None);
        again.price = Money::from_minor(119_900, INR);

        line.merge(again);

        assert_eq!(line.quantity(), 3);
        assert_eq!(line.price(), &Money::from_minor(119_900, INR));
        assert_eq!(line.stock_hint(), Some(2));
    }

    #[test]
    fn record_round_trip_preserves_line() -> TestResult {
        let line = CartLine::from_new(new_line(2, Some(5)));
        let record = CartLineRecord::from(&line);

        assert_eq!(record.price, "1249.50 INR");
        assert_eq!(CartLine::try_from(record)?, line);

        Ok(())
    }
}
