//! Order Totals
//!
//! Combines the cart subtotal, an applied coupon and the shipping policy into the payable grand
//! total.

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Serialize;
use thiserror::Error;

use crate::{
    coupons::AppliedCoupon,
    money::{amount_of, ensure_currency, money_from_amount, round_currency, zero},
};

/// Errors raised while computing order totals.
#[derive(Debug, Error, PartialEq)]
pub enum TotalsError {
    /// The subtotal, coupon and policy are not all in one currency.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Shipping rules for an order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShippingPolicy<'a> {
    /// Subtotal at or above which shipping is free
    pub free_shipping_threshold: Money<'a, Currency>,

    /// Charge applied below the threshold
    pub flat_shipping_charge: Money<'a, Currency>,
}

impl<'a> ShippingPolicy<'a> {
    /// Create a policy.
    pub fn new(
        free_shipping_threshold: Money<'a, Currency>,
        flat_shipping_charge: Money<'a, Currency>,
    ) -> Self {
        Self {
            free_shipping_threshold,
            flat_shipping_charge,
        }
    }

    /// Currency of the policy amounts.
    pub fn currency(&self) -> &'a Currency {
        self.free_shipping_threshold.currency()
    }

    /// Shipping charged on a pre-discount `subtotal`. The threshold itself ships free.
    pub fn shipping_for(&self, subtotal: &Money<'a, Currency>) -> Money<'a, Currency> {
        if amount_of(subtotal) >= amount_of(&self.free_shipping_threshold) {
            zero(self.flat_shipping_charge.currency())
        } else {
            self.flat_shipping_charge
        }
    }
}

/// Breakdown of what the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrderTotals<'a> {
    /// Cart subtotal before discount
    #[serde(serialize_with = "serialize_amount")]
    pub subtotal: Money<'a, Currency>,

    /// Coupon discount
    #[serde(serialize_with = "serialize_amount")]
    pub discount: Money<'a, Currency>,

    /// Shipping charge
    #[serde(serialize_with = "serialize_amount")]
    pub shipping_charge: Money<'a, Currency>,

    /// Payable amount, never negative
    #[serde(serialize_with = "serialize_amount")]
    pub grand_total: Money<'a, Currency>,
}

/// Compute the order totals for a cart `subtotal`.
///
/// Shipping is decided on the subtotal before discount. The grand total is rounded to whole
/// currency units and never drops below zero. Calling this twice with the same inputs gives the
/// same result.
///
/// # Errors
///
/// Returns [`TotalsError::Money`] if the coupon or policy is in a different currency from the
/// subtotal.
pub fn compute_totals<'a>(
    subtotal: &Money<'a, Currency>,
    applied: Option<&AppliedCoupon<'a>>,
    policy: &ShippingPolicy<'a>,
) -> Result<OrderTotals<'a>, TotalsError> {
    let currency = subtotal.currency();

    ensure_currency(currency, &policy.free_shipping_threshold)?;
    ensure_currency(currency, &policy.flat_shipping_charge)?;

    let discount = match applied {
        Some(applied) => {
            ensure_currency(currency, applied.calculated_discount())?;
            *applied.calculated_discount()
        }
        None => zero(currency),
    };

    let shipping_charge = policy.shipping_for(subtotal);

    let grand_total = round_currency(
        amount_of(subtotal) - amount_of(&discount) + amount_of(&shipping_charge),
    )
    .max(Decimal::ZERO);

    Ok(OrderTotals {
        subtotal: *subtotal,
        discount,
        shipping_charge,
        grand_total: money_from_amount(grand_total, currency),
    })
}

/// Serialize money as its decimal amount in major units.
pub(crate) fn serialize_amount<S: serde::Serializer>(
    money: &Money<'_, Currency>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    Serialize::serialize(&amount_of(money), serializer)
}
