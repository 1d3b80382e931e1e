//! Fixtures
//!
//! Checkout scenarios described in YAML: a product catalog, the cart built from it, the coupons
//! the backend knows and the code the shopper types. Used by the `quote` command and the
//! integration tests.

use std::{fs, path::Path};

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    backend::{BackendError, CouponLookup},
    cart::{CartError, CartStore, NewCartLine},
    checkout::Checkout,
    config::ShippingConfig,
    coupons::{CouponCode, CouponRecord},
    money::{PriceError, parse_currency},
    products::{Product, ProductRecord, ProductRecordError, ProductUuid},
    storage::Storage,
};

/// Namespace for product ids derived from fixture keys.
const FIXTURE_PRODUCT_NAMESPACE: Uuid =
    Uuid::from_u128(0x0198_f3a2_4c1e_5b35_9a60_2f1d_8e7c_4b00);

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Unknown fixture currency
    #[error(transparent)]
    Price(#[from] PriceError),

    /// A product in the fixture is malformed
    #[error("Invalid product: {0}")]
    Product(#[from] ProductRecordError),

    /// A cart line names a product the fixture does not define
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product is priced in a different currency from the fixture
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The cart rejected a line
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Product as written in a fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureProduct {
    /// Fixed id; derived from the product key when omitted
    #[serde(default)]
    pub id: Option<ProductUuid>,

    /// Display title
    pub title: String,

    /// Price, e.g. `"799 INR"`
    pub price: String,

    /// MRP, e.g. `"999 INR"`
    #[serde(default)]
    pub mrp: Option<String>,

    /// Units in stock
    #[serde(default)]
    pub stock: Option<i64>,

    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
}

/// Cart line as written in a fixture.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureLine {
    /// Key of the product in the fixture catalog
    pub product: String,

    /// Units
    #[serde(default = "one")]
    pub quantity: u32,

    /// Variant description
    #[serde(default)]
    pub variant: Option<String>,
}

fn one() -> u32 {
    1
}

/// A complete checkout scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutFixture {
    /// Store currency; the configured one is used when omitted
    #[serde(default)]
    pub currency: Option<String>,

    /// Shipping policy override
    #[serde(default)]
    pub shipping: Option<ShippingConfig>,

    /// Catalog keyed by fixture-local name
    #[serde(default)]
    pub products: FxHashMap<String, FixtureProduct>,

    /// Cart contents, in order of addition
    #[serde(default)]
    pub cart: Vec<FixtureLine>,

    /// Coupons the backend knows
    #[serde(default)]
    pub coupons: Vec<CouponRecord>,

    /// Code the shopper types
    #[serde(default)]
    pub coupon: Option<String>,

    /// Instant the checkout happens at; now when omitted
    #[serde(default)]
    pub at: Option<Timestamp>,
}

impl CheckoutFixture {
    /// Load a fixture from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path.as_ref())?;

        Self::from_yaml(&contents)
    }

    /// Parse a fixture from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML does not describe a fixture.
    pub fn from_yaml(contents: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// The fixture's currency, or `fallback` when it names none.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Price`] for an unknown currency code.
    pub fn currency(&self, fallback: &'static Currency) -> Result<&'static Currency, FixtureError> {
        match self.currency.as_deref() {
            Some(code) => Ok(parse_currency(code)?),
            None => Ok(fallback),
        }
    }

    /// Normalize the catalog, checking every product is priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if a product is malformed or priced in another currency.
    pub fn catalog(
        &self,
        currency: &'static Currency,
    ) -> Result<FxHashMap<String, Product<'static>>, FixtureError> {
        self.products
            .iter()
            .map(|(key, fixture)| -> Result<_, FixtureError> {
                let product = Product::try_from(ProductRecord {
                    id: fixture.id.unwrap_or_else(|| {
                        ProductUuid::from_name(&FIXTURE_PRODUCT_NAMESPACE, key)
                    }),
                    title: fixture.title.clone(),
                    price: fixture.price.clone(),
                    mrp: fixture.mrp.clone(),
                    stock: fixture.stock,
                    images: fixture.image.iter().cloned().collect(),
                })?;

                for money in [&product.price, &product.mrp] {
                    if money.currency() != currency {
                        return Err(FixtureError::CurrencyMismatch(
                            currency.iso_alpha_code.to_string(),
                            money.currency().iso_alpha_code.to_string(),
                        ));
                    }
                }

                Ok((key.clone(), product))
            })
            .collect()
    }

    /// Build the checkout the fixture describes, persisting into `storage`.
    ///
    /// The fixture's shipping override wins over `shipping`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog is invalid or a cart line names an unknown product.
    pub fn checkout<S: Storage>(
        &self,
        storage: S,
        fallback_currency: &'static Currency,
        shipping: &ShippingConfig,
    ) -> Result<Checkout<'static, S>, FixtureError> {
        let currency = self.currency(fallback_currency)?;
        let catalog = self.catalog(currency)?;
        let policy = self.shipping.as_ref().unwrap_or(shipping).policy(currency);

        let mut checkout = Checkout::new(CartStore::new(currency, storage), policy);

        for line in &self.cart {
            let product = catalog
                .get(&line.product)
                .ok_or_else(|| FixtureError::ProductNotFound(line.product.clone()))?;

            checkout.add_item(NewCartLine::from_product(
                product,
                line.quantity,
                line.variant.clone(),
            ))?;
        }

        debug!(
            lines = checkout.cart().len(),
            currency = currency.iso_alpha_code,
            "built checkout from fixture"
        );

        Ok(checkout)
    }

    /// The fixture's coupons, served as a coupon backend.
    pub fn coupon_lookup(&self) -> FixtureCoupons {
        FixtureCoupons::new(self.coupons.clone())
    }
}

/// Coupon backend answering from fixture records.
#[derive(Debug, Clone, Default)]
pub struct FixtureCoupons {
    records: Vec<CouponRecord>,
}

impl FixtureCoupons {
    /// Serve the given records.
    pub fn new(records: Vec<CouponRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl CouponLookup for FixtureCoupons {
    async fn find_active_coupon(
        &self,
        code: &CouponCode,
    ) -> Result<Option<CouponRecord>, BackendError> {
        Ok(self
            .records
            .iter()
            .find(|record| {
                record.is_active != Some(false)
                    && CouponCode::parse(&record.code).as_ref() == Some(code)
            })
            .cloned())
    }
}
