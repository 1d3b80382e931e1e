//! Coupons
//!
//! Validation of a looked-up coupon against the cart subtotal and the current instant, and
//! computation of the discount it grants. Evaluation is pure: it never talks to the backend and
//! never changes the coupon's usage count.

use std::fmt;

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::money::{
    amount_of, apply_cap, money_from_amount, percent_of, percentage_points, round_currency,
};

pub mod errors;
pub mod records;

pub use errors::{CouponError, CouponRecordError};
pub use records::{CouponRecord, DiscountType};

/// Normalized coupon code: trimmed and uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CouponCode(String);

impl CouponCode {
    /// Normalize user input. Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim();

        if code.is_empty() {
            None
        } else {
            Some(Self(code.to_uppercase()))
        }
    }

    /// The normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CouponCode {
    type Error = CouponRecordError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(CouponRecordError::MissingCode)
    }
}

impl From<CouponCode> for String {
    fn from(code: CouponCode) -> Self {
        code.0
    }
}

/// What a coupon takes off the subtotal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CouponDiscount<'a> {
    /// A share of the subtotal, optionally capped
    Percent {
        /// Share of the subtotal
        rate: Percentage,
        /// Upper bound on the discount
        max_discount: Option<Money<'a, Currency>>,
    },

    /// A flat amount, never more than the subtotal
    Fixed(Money<'a, Currency>),
}

impl<'a> CouponDiscount<'a> {
    /// Percent or fixed.
    pub fn discount_type(&self) -> DiscountType {
        match self {
            CouponDiscount::Percent { .. } => DiscountType::Percent,
            CouponDiscount::Fixed(_) => DiscountType::Fixed,
        }
    }

    /// Percentage points for percent discounts, major units for fixed ones.
    pub fn value(&self) -> Decimal {
        match self {
            CouponDiscount::Percent { rate, .. } => percentage_points(*rate),
            CouponDiscount::Fixed(amount) => amount_of(amount),
        }
    }

    /// Cap on a percent discount.
    pub fn max_discount(&self) -> Option<&Money<'a, Currency>> {
        match self {
            CouponDiscount::Percent { max_discount, .. } => max_discount.as_ref(),
            CouponDiscount::Fixed(_) => None,
        }
    }

    /// Unrounded discount on `subtotal`.
    fn amount_on(&self, subtotal: Decimal) -> Decimal {
        match self {
            CouponDiscount::Percent { rate, max_discount } => apply_cap(
                percent_of(subtotal, *rate),
                max_discount.as_ref().map(amount_of),
            ),
            CouponDiscount::Fixed(amount) => amount_of(amount).min(subtotal),
        }
    }
}

/// A coupon as defined in the back office, normalized for one currency.
///
/// Coupons are read-only to the client; build them with [`Coupon::from_record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon<'a> {
    code: CouponCode,
    discount: CouponDiscount<'a>,
    min_cart_value: Option<Money<'a, Currency>>,
    usage_limit: Option<u32>,
    used_count: u32,
    starts_at: Option<Timestamp>,
    expires_at: Option<Timestamp>,
    is_active: bool,
    currency: &'a Currency,
}

impl<'a> Coupon<'a> {
    /// Code
    pub fn code(&self) -> &CouponCode {
        &self.code
    }

    /// Discount
    pub fn discount(&self) -> &CouponDiscount<'a> {
        &self.discount
    }

    /// Minimum cart subtotal, if any
    pub fn min_cart_value(&self) -> Option<&Money<'a, Currency>> {
        self.min_cart_value.as_ref()
    }

    /// Maximum redemptions, if limited
    pub fn usage_limit(&self) -> Option<u32> {
        self.usage_limit
    }

    /// Redemptions so far
    pub fn used_count(&self) -> u32 {
        self.used_count
    }

    /// Start of validity, inclusive
    pub fn starts_at(&self) -> Option<Timestamp> {
        self.starts_at
    }

    /// End of validity, inclusive
    pub fn expires_at(&self) -> Option<Timestamp> {
        self.expires_at
    }

    /// Whether the coupon is switched on
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Currency the coupon's amounts are in
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

/// A coupon that passed evaluation, with the discount it grants on the evaluated subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon<'a> {
    code: CouponCode,
    discount: CouponDiscount<'a>,
    calculated_discount: Money<'a, Currency>,
}

impl<'a> AppliedCoupon<'a> {
    /// Code
    pub fn code(&self) -> &CouponCode {
        &self.code
    }

    /// Percent or fixed
    pub fn discount_type(&self) -> DiscountType {
        self.discount.discount_type()
    }

    /// Percentage points or major units, see [`CouponDiscount::value`]
    pub fn discount_value(&self) -> Decimal {
        self.discount.value()
    }

    /// Cap on a percent discount
    pub fn max_discount(&self) -> Option<&Money<'a, Currency>> {
        self.discount.max_discount()
    }

    /// Discount in whole currency units
    pub fn calculated_discount(&self) -> &Money<'a, Currency> {
        &self.calculated_discount
    }
}

/// Check `coupon` against the cart `subtotal` at `now` and compute its discount.
///
/// Rules are checked in order and the first failure is returned: missing or inactive coupons,
/// start date, expiry date, usage limit, then minimum subtotal. Both time bounds are inclusive.
///
/// # Errors
///
/// Returns the [`CouponError`] for the first rule the coupon fails.
pub fn evaluate<'a>(
    coupon: Option<&Coupon<'a>>,
    subtotal: &Money<'a, Currency>,
    now: Timestamp,
) -> Result<AppliedCoupon<'a>, CouponError<'a>> {
    let Some(coupon) = coupon.filter(|coupon| coupon.is_active) else {
        return Err(CouponError::Invalid);
    };

    if coupon.currency != subtotal.currency() {
        warn!(
            code = %coupon.code,
            coupon_currency = coupon.currency.iso_alpha_code,
            cart_currency = subtotal.currency().iso_alpha_code,
            "coupon currency does not match the cart"
        );

        return Err(CouponError::Invalid);
    }

    if coupon.starts_at.is_some_and(|starts_at| now < starts_at) {
        return Err(CouponError::NotYetActive);
    }

    if coupon.expires_at.is_some_and(|expires_at| now > expires_at) {
        return Err(CouponError::Expired);
    }

    if coupon
        .usage_limit
        .is_some_and(|limit| coupon.used_count >= limit)
    {
        return Err(CouponError::UsageLimitReached);
    }

    let subtotal_amount = amount_of(subtotal);

    if let Some(required) = coupon.min_cart_value
        && subtotal_amount < amount_of(&required)
    {
        return Err(CouponError::BelowMinimum { required });
    }

    // Rounding to whole units must not lift a discount past a fractional cap.
    let discount = apply_cap(
        round_currency(coupon.discount.amount_on(subtotal_amount)),
        coupon.discount.max_discount().map(|cap| amount_of(cap).floor()),
    );

    Ok(AppliedCoupon {
        code: coupon.code.clone(),
        discount: coupon.discount,
        calculated_discount: money_from_amount(discount, coupon.currency),
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    fn record(discount_type: DiscountType, value: i64) -> CouponRecord {
        CouponRecord {
            code: "SAVE".to_string(),
            discount_type,
            discount_value: Decimal::from(value),
            max_discount: None,
            min_cart_value: None,
            usage_limit: None,
            used_count: None,
            starts_at: None,
            expires_at: None,
            is_active: Some(true),
        }
    }

    fn coupon(record: &CouponRecord) -> Result<Coupon<'static>, CouponRecordError> {
        Coupon::from_record(record, INR)
    }

    fn inr(major: i64) -> Money<'static, Currency> {
        Money::from_minor(major * 100, INR)
    }

    fn now() -> Result<Timestamp, jiff::Error> {
        "2026-03-15T12:00:00Z".parse()
    }

    #[test]
    fn coupon_code_is_trimmed_and_uppercased() {
        assert_eq!(
            CouponCode::parse("  festive10 ").map(String::from),
            Some("FESTIVE10".to_string())
        );
        assert_eq!(CouponCode::parse("   "), None);
    }

    #[test]
    fn missing_coupon_is_invalid() -> TestResult {
        assert_eq!(evaluate(None, &inr(1_000), now()?), Err(CouponError::Invalid));

        Ok(())
    }

    #[test]
    fn inactive_coupon_is_invalid() -> TestResult {
        let coupon = coupon(&CouponRecord {
            is_active: Some(false),
            ..record(DiscountType::Percent, 10)
        })?;

        assert_eq!(
            evaluate(Some(&coupon), &inr(1_000), now()?),
            Err(CouponError::Invalid)
        );

        Ok(())
    }

    #[test]
    fn coupon_in_another_currency_is_invalid() -> TestResult {
        let coupon = Coupon::from_record(&record(DiscountType::Fixed, 10), GBP)?;

        assert_eq!(
            evaluate(Some(&coupon), &inr(1_000), now()?),
            Err(CouponError::Invalid)
        );

        Ok(())
    }

    #[test]
    fn start_bound_is_inclusive() -> TestResult {
        let now = now()?;
        let coupon = coupon(&CouponRecord {
            starts_at: Some(now),
            ..record(DiscountType::Fixed, 50)
        })?;

        assert!(evaluate(Some(&coupon), &inr(1_000), now).is_ok());
        assert_eq!(
            evaluate(Some(&coupon), &inr(1_000), now - jiff::SignedDuration::from_secs(1)),
            Err(CouponError::NotYetActive)
        );

        Ok(())
    }

    #[test]
    fn expiry_bound_is_inclusive() -> TestResult {
        let now = now()?;
        let coupon = coupon(&CouponRecord {
            expires_at: Some(now),
            ..record(DiscountType::Fixed, 50)
        })?;

        assert!(evaluate(Some(&coupon), &inr(1_000), now).is_ok());
        assert_eq!(
            evaluate(Some(&coupon), &inr(1_000), now + jiff::SignedDuration::from_secs(1)),
            Err(CouponError::Expired)
        );

        Ok(())
    }

    #[test]
    fn usage_limit_reached() -> TestResult {
        let exhausted = coupon(&CouponRecord {
            usage_limit: Some(100),
            used_count: Some(100),
            ..record(DiscountType::Fixed, 50)
        })?;
        let never_usable = coupon(&CouponRecord {
            usage_limit: Some(0),
            ..record(DiscountType::Fixed, 50)
        })?;

        assert_eq!(
            evaluate(Some(&exhausted), &inr(1_000), now()?),
            Err(CouponError::UsageLimitReached)
        );
        assert_eq!(
            evaluate(Some(&never_usable), &inr(1_000), now()?),
            Err(CouponError::UsageLimitReached)
        );

        Ok(())
    }

    #[test]
    fn first_failing_rule_wins() -> TestResult {
        let now = now()?;
        let coupon = coupon(&CouponRecord {
            expires_at: Some(now - jiff::SignedDuration::from_hours(1)),
            usage_limit: Some(1),
            used_count: Some(1),
            min_cart_value: Some(Decimal::from(5_000)),
            ..record(DiscountType::Percent, 10)
        })?;

        assert_eq!(
            evaluate(Some(&coupon), &inr(100), now),
            Err(CouponError::Expired)
        );

        Ok(())
    }

    #[test]
    fn below_minimum_regardless_of_type() -> TestResult {
        for discount_type in [DiscountType::Percent, DiscountType::Fixed] {
            let coupon = coupon(&CouponRecord {
                min_cart_value: Some(Decimal::from(999)),
                ..record(discount_type, 10)
            })?;

            assert_eq!(
                evaluate(Some(&coupon), &inr(998), now()?),
                Err(CouponError::BelowMinimum {
                    required: inr(999)
                })
            );
            assert!(evaluate(Some(&coupon), &inr(999), now()?).is_ok());
        }

        Ok(())
    }

    #[test]
    fn percent_discount_is_capped() -> TestResult {
        let coupon = coupon(&CouponRecord {
            max_discount: Some(Decimal::from(100)),
            ..record(DiscountType::Percent, 10)
        })?;

        let applied = evaluate(Some(&coupon), &inr(2_000), now()?)?;

        assert_eq!(applied.calculated_discount(), &inr(100));
        assert_eq!(applied.discount_type(), DiscountType::Percent);
        assert_eq!(applied.discount_value(), Decimal::from(10));
        assert_eq!(applied.max_discount(), Some(&inr(100)));

        Ok(())
    }

    #[test]
    fn fractional_cap_is_never_exceeded() -> TestResult {
        let coupon = coupon(&CouponRecord {
            max_discount: Some(Decimal::new(9_950, 2)),
            ..record(DiscountType::Percent, 10)
        })?;

        for subtotal in [995, 1_000, 2_000, 50_000] {
            let applied = evaluate(Some(&coupon), &inr(subtotal), now()?)?;

            assert!(
                amount_of(applied.calculated_discount()) <= Decimal::new(9_950, 2),
                "discount on {subtotal} went past the cap"
            );
        }

        let applied = evaluate(Some(&coupon), &inr(2_000), now()?)?;

        assert_eq!(applied.calculated_discount(), &inr(99));

        Ok(())
    }

    #[test]
    fn percent_discount_is_rounded_half_up() -> TestResult {
        let coupon = coupon(&record(DiscountType::Percent, 15))?;

        // 15% of 999 = 149.85
        let applied = evaluate(Some(&coupon), &inr(999), now()?)?;

        assert_eq!(applied.calculated_discount(), &inr(150));

        Ok(())
    }

    #[test]
    fn fixed_discount_is_clamped_to_subtotal() -> TestResult {
        let coupon = coupon(&record(DiscountType::Fixed, 500))?;

        let applied = evaluate(Some(&coupon), &inr(300), now()?)?;

        assert_eq!(applied.calculated_discount(), &inr(300));
        assert_eq!(applied.max_discount(), None);

        Ok(())
    }

    #[test]
    fn evaluation_is_deterministic() -> TestResult {
        let coupon = coupon(&record(DiscountType::Percent, 12))?;
        let now = now()?;

        assert_eq!(
            evaluate(Some(&coupon), &inr(1_234), now)?,
            evaluate(Some(&coupon), &inr(1_234), now)?
        );

        Ok(())
    }
}
