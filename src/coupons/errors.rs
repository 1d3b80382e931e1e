//! Coupon errors.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Why a coupon cannot be applied to the cart.
///
/// Each variant is a user-correctable condition shown inline next to the coupon field.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponError<'a> {
    /// The code does not exist or the coupon is switched off.
    #[error("Invalid coupon code")]
    Invalid,

    /// The coupon's start date is still in the future.
    #[error("This coupon is not active yet")]
    NotYetActive,

    /// The coupon's expiry date has passed.
    #[error("This coupon has expired")]
    Expired,

    /// The coupon has been redeemed as often as allowed.
    #[error("This coupon has reached its usage limit")]
    UsageLimitReached,

    /// The cart subtotal is below the coupon's minimum.
    #[error("Add items worth {required} or more to use this coupon")]
    BelowMinimum {
        /// Minimum subtotal the coupon needs
        required: Money<'a, Currency>,
    },
}

/// Errors raised while normalizing a coupon record from the backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponRecordError {
    /// The record has no code.
    #[error("coupon record has no code")]
    MissingCode,

    /// The discount value is negative, or above 100 for a percentage coupon.
    #[error("coupon {code} has an invalid discount value {value}")]
    InvalidDiscountValue {
        /// Normalized code
        code: String,
        /// Raw value
        value: Decimal,
    },

    /// A monetary bound is negative.
    #[error("coupon {code} has a negative {field}")]
    NegativeAmount {
        /// Normalized code
        code: String,
        /// Offending field
        field: &'static str,
    },
}
