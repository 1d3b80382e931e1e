//! Products

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::{PriceError, money_from_amount, mrp_savings, parse_price};

pub use crate::uuids::ProductUuid;

/// Errors raised while normalizing product data from the backend.
#[derive(Debug, Error, PartialEq)]
pub enum ProductRecordError {
    /// A price field could not be parsed.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// The product has no title.
    #[error("product {0} has no title")]
    MissingTitle(ProductUuid),
}

/// Catalog product, as shown on a product detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub uuid: ProductUuid,

    /// Display title
    pub title: String,

    /// Current selling price
    pub price: Money<'a, Currency>,

    /// Reference list price, shown struck through
    pub mrp: Money<'a, Currency>,

    /// Units in stock
    pub stock: u32,

    /// Primary image URL
    pub image: String,
}

impl Product<'_> {
    /// Whether any stock remains.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Discount against MRP, for the "x% off" badge.
    pub fn mrp_savings(&self) -> decimal_percentage::Percentage {
        mrp_savings(&self.price, &self.mrp)
    }
}

/// Product row as returned by the catalog backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductRecord {
    /// Product id
    pub id: ProductUuid,

    /// Display title
    pub title: String,

    /// Price, e.g. `"199.50 INR"`
    pub price: String,

    /// MRP; falls back to the price when missing
    #[serde(default)]
    pub mrp: Option<String>,

    /// Units in stock; negative or missing stock reads as none
    #[serde(default)]
    pub stock: Option<i64>,

    /// Image URLs, first is primary
    #[serde(default)]
    pub images: Vec<String>,
}

impl TryFrom<ProductRecord> for Product<'static> {
    type Error = ProductRecordError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        let title = record.title.trim();

        if title.is_empty() {
            return Err(ProductRecordError::MissingTitle(record.id));
        }

        let price = parse_price(&record.price)?;
        let mrp = match record.mrp.as_deref() {
            Some(mrp) => parse_price(mrp)?,
            None => price,
        };

        Ok(Product {
            uuid: record.id,
            title: title.to_string(),
            price,
            mrp,
            stock: normalize_stock(record.stock),
            image: record.images.into_iter().next().unwrap_or_default(),
        })
    }
}

/// Live stock and price for a product, used for wishlist alerts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProductSnapshot<'a> {
    /// Units in stock
    pub stock: u32,

    /// Current selling price
    pub price: Money<'a, Currency>,
}

/// Stock/price row as returned by the catalog backend.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProductSnapshotRecord {
    /// Units in stock
    #[serde(default)]
    pub stock: Option<i64>,

    /// Price in major units of the store currency
    pub price: Decimal,
}

impl<'a> ProductSnapshot<'a> {
    /// Normalize a backend snapshot row into the store currency.
    pub fn from_record(record: &ProductSnapshotRecord, currency: &'a Currency) -> Self {
        ProductSnapshot {
            stock: normalize_stock(record.stock),
            price: money_from_amount(record.price, currency),
        }
    }
}

fn normalize_stock(stock: Option<i64>) -> u32 {
    stock.map_or(0, |stock| u32::try_from(stock.max(0)).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn record() -> ProductRecord {
        ProductRecord {
            id: ProductUuid::now_v7(),
            title: " Cotton Kurta ".to_string(),
            price: "799 INR".to_string(),
            mrp: Some("999 INR".to_string()),
            stock: Some(4),
            images: vec!["https://cdn.example/kurta.jpg".to_string()],
        }
    }

    #[test]
    fn record_normalizes_into_product() -> TestResult {
        let product = Product::try_from(record())?;

        assert_eq!(product.title, "Cotton Kurta");
        assert_eq!(product.price, Money::from_minor(79_900, INR));
        assert_eq!(product.mrp, Money::from_minor(99_900, INR));
        assert_eq!(product.stock, 4);
        assert_eq!(product.image, "https://cdn.example/kurta.jpg");
        assert!(product.in_stock());

        Ok(())
    }

    #[test]
    fn missing_mrp_falls_back_to_price() -> TestResult {
        let product = Product::try_from(ProductRecord {
            mrp: None,
            ..record()
        })?;

        assert_eq!(product.mrp, product.price);

        Ok(())
    }

    #[test]
    fn negative_or_missing_stock_is_out_of_stock() -> TestResult {
        let negative = Product::try_from(ProductRecord {
            stock: Some(-3),
            ..record()
        })?;
        let missing = Product::try_from(ProductRecord {
            stock: None,
            ..record()
        })?;

        assert_eq!(negative.stock, 0);
        assert_eq!(missing.stock, 0);
        assert!(!missing.in_stock());

        Ok(())
    }

    #[test]
    fn blank_title_is_rejected() {
        let record = ProductRecord {
            title: "  ".to_string(),
            ..record()
        };
        let id = record.id;

        assert_eq!(
            Product::try_from(record),
            Err(ProductRecordError::MissingTitle(id))
        );
    }

    #[test]
    fn snapshot_record_uses_store_currency() {
        let snapshot = ProductSnapshot::from_record(
            &ProductSnapshotRecord {
                stock: Some(-1),
                price: Decimal::new(64_900, 2),
            },
            INR,
        );

        assert_eq!(snapshot.stock, 0);
        assert_eq!(snapshot.price, Money::from_minor(64_900, INR));
    }
}
