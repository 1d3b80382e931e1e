//! Checkout scenarios loaded from the YAML fixtures in `fixtures/checkouts`.
//!
//! | Fixture                 | Subtotal | Discount | Shipping | Grand total |
//! |-------------------------|---------:|---------:|---------:|------------:|
//! | below-threshold         |      450 |        0 |       49 |         499 |
//! | free-shipping           |      600 |        0 |        0 |         600 |
//! | capped-percent-coupon   |     2000 |      100 |        0 |        1900 |
//! | expired-coupon          |     2000 |        0 |        0 |        2000 |
//! | merged-lines            |     2397 |        0 |        0 |        2397 |

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, INR},
};
use testresult::TestResult;

use cartwright::{
    cart::CartLine,
    checkout::{ApplyCouponError, Checkout},
    config::ShippingConfig,
    coupons::CouponError,
    fixtures::{CheckoutFixture, FixtureError},
    storage::MemoryStorage,
    totals::OrderTotals,
};

fn load(name: &str) -> Result<(CheckoutFixture, Checkout<'static, MemoryStorage>), FixtureError> {
    let path = format!("{}/fixtures/checkouts/{name}.yml", env!("CARGO_MANIFEST_DIR"));
    let fixture = CheckoutFixture::load(path)?;

    // Fixtures carry their own shipping policy; this one must never be used.
    let shipping = ShippingConfig {
        free_shipping_threshold: Decimal::from(1_000_000),
        flat_shipping_charge: Decimal::from(999),
    };

    let checkout = fixture.checkout(MemoryStorage::new(), iso::GBP, &shipping)?;

    Ok((fixture, checkout))
}

fn inr(major: i64) -> Money<'static, iso::Currency> {
    Money::from_minor(major * 100, INR)
}

fn assert_totals(
    totals: &OrderTotals<'_>,
    subtotal: i64,
    discount: i64,
    shipping: i64,
    grand_total: i64,
) {
    assert_eq!(totals.subtotal, inr(subtotal), "subtotal");
    assert_eq!(totals.discount, inr(discount), "discount");
    assert_eq!(totals.shipping_charge, inr(shipping), "shipping");
    assert_eq!(totals.grand_total, inr(grand_total), "grand total");
}

#[test]
fn subtotal_below_threshold_pays_flat_shipping() -> TestResult {
    let (_, checkout) = load("below-threshold")?;

    assert_totals(&checkout.totals()?, 450, 0, 49, 499);

    Ok(())
}

#[test]
fn subtotal_above_threshold_ships_free() -> TestResult {
    let (_, checkout) = load("free-shipping")?;

    assert_totals(&checkout.totals()?, 600, 0, 0, 600);

    Ok(())
}

#[tokio::test]
async fn percent_coupon_is_capped_at_max_discount() -> TestResult {
    let (fixture, mut checkout) = load("capped-percent-coupon")?;
    let code = fixture.coupon.clone().unwrap_or_default();
    let now = fixture.at.ok_or("fixture has no instant")?;

    let applied = checkout
        .apply_coupon(&fixture.coupon_lookup(), &code, now)
        .await?;

    assert_eq!(applied.code().as_str(), "FESTIVE10");
    assert_eq!(applied.calculated_discount(), &inr(100));

    assert_totals(&checkout.totals()?, 2000, 100, 0, 1900);

    Ok(())
}

#[tokio::test]
async fn expired_coupon_leaves_totals_unchanged() -> TestResult {
    let (fixture, mut checkout) = load("expired-coupon")?;
    let code = fixture.coupon.clone().unwrap_or_default();
    let now = fixture.at.ok_or("fixture has no instant")?;

    let before = checkout.totals()?;
    let result = checkout
        .apply_coupon(&fixture.coupon_lookup(), &code, now)
        .await
        .map(|_applied| ());

    assert!(matches!(
        result,
        Err(ApplyCouponError::Rejected(CouponError::Expired))
    ));
    assert!(checkout.applied_coupon().is_none());
    assert_eq!(checkout.totals()?, before);
    assert_totals(&before, 2000, 0, 0, 2000);

    Ok(())
}

#[test]
fn same_product_and_variant_become_one_line() -> TestResult {
    let (_, checkout) = load("merged-lines")?;

    let lines = checkout.cart().lines();

    assert_eq!(lines.len(), 1);
    assert_eq!(lines.first().map(CartLine::quantity), Some(3));
    assert_eq!(checkout.cart().item_count(), 3);

    assert_totals(&checkout.totals()?, 2397, 0, 0, 2397);

    Ok(())
}

#[tokio::test]
async fn coupon_is_dropped_when_cart_falls_below_minimum() -> TestResult {
    let (fixture, mut checkout) = load("capped-percent-coupon")?;
    let code = fixture.coupon.clone().unwrap_or_default();
    let now = fixture.at.ok_or("fixture has no instant")?;

    checkout
        .apply_coupon(&fixture.coupon_lookup(), &code, now)
        .await?;

    let saree = checkout
        .cart()
        .lines()
        .first()
        .map(CartLine::uuid)
        .ok_or("fixture cart is empty")?;

    checkout.remove_item(saree);

    assert!(checkout.applied_coupon().is_none());
    assert!(matches!(
        checkout.take_coupon_notice(),
        Some(CouponError::BelowMinimum { .. })
    ));
    assert_totals(&checkout.totals()?, 0, 0, 49, 49);

    Ok(())
}
