//! Coupon Records
//!
//! Coupon rows as the backend returns them, and the single step that resolves their optional
//! fields into a [`Coupon`].

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    coupons::{Coupon, CouponCode, CouponDiscount, errors::CouponRecordError},
    money::{money_from_amount, percentage_from_points},
};

/// How a coupon's discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage of the subtotal, optionally capped
    #[serde(alias = "percentage")]
    Percent,

    /// Flat amount off
    #[serde(alias = "flat")]
    Fixed,
}

/// Coupon row as returned by the catalog backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouponRecord {
    /// Code as stored; matched case-insensitively
    pub code: String,

    /// Percent or fixed
    pub discount_type: DiscountType,

    /// Percentage points for percent coupons, major currency units for fixed ones
    pub discount_value: Decimal,

    /// Cap on a percent discount
    #[serde(default)]
    pub max_discount: Option<Decimal>,

    /// Minimum cart subtotal
    #[serde(default, alias = "min_order_value")]
    pub min_cart_value: Option<Decimal>,

    /// Maximum redemptions
    #[serde(default)]
    pub usage_limit: Option<u32>,

    /// Redemptions so far
    #[serde(default)]
    pub used_count: Option<u32>,

    /// Start of validity
    #[serde(default)]
    pub starts_at: Option<Timestamp>,

    /// End of validity
    #[serde(default)]
    pub expires_at: Option<Timestamp>,

    /// Whether the coupon is switched on; lookups only return active rows
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl<'a> Coupon<'a> {
    /// Resolve a backend record into a coupon priced in `currency`.
    ///
    /// # Errors
    ///
    /// Returns a [`CouponRecordError`] when the code is blank, the discount value is negative
    /// (or above 100 for a percentage), or a monetary bound is negative.
    pub fn from_record(
        record: &CouponRecord,
        currency: &'a Currency,
    ) -> Result<Self, CouponRecordError> {
        let code = CouponCode::parse(&record.code).ok_or(CouponRecordError::MissingCode)?;

        let invalid_value = || CouponRecordError::InvalidDiscountValue {
            code: code.to_string(),
            value: record.discount_value,
        };

        let non_negative = |value: Option<Decimal>, field: &'static str| match value {
            Some(value) if value.is_sign_negative() && !value.is_zero() => {
                Err(CouponRecordError::NegativeAmount {
                    code: code.to_string(),
                    field,
                })
            }
            other => Ok(other.map(|value| money_from_amount(value, currency))),
        };

        if record.discount_value.is_sign_negative() && !record.discount_value.is_zero() {
            return Err(invalid_value());
        }

        let discount = match record.discount_type {
            DiscountType::Percent if record.discount_value > Decimal::ONE_HUNDRED => {
                return Err(invalid_value());
            }
            DiscountType::Percent => CouponDiscount::Percent {
                rate: percentage_from_points(record.discount_value),
                max_discount: non_negative(record.max_discount, "max_discount")?,
            },
            DiscountType::Fixed => {
                CouponDiscount::Fixed(money_from_amount(record.discount_value, currency))
            }
        };

        Ok(Coupon {
            min_cart_value: non_negative(record.min_cart_value, "min_cart_value")?,
            code,
            discount,
            usage_limit: record.usage_limit,
            used_count: record.used_count.unwrap_or_default(),
            starts_at: record.starts_at,
            expires_at: record.expires_at,
            is_active: record.is_active.unwrap_or(true),
            currency,
        })
    }
}
