//! Money
//!
//! Rounding, percentage and cap primitives used by the cart, coupon and totals calculations.
//!
//! Amounts travel as [`Money`] but any arithmetic that can produce fractional intermediates is
//! done on [`Decimal`] amounts in major units, then rounded exactly once with
//! [`round_currency`] before being turned back into [`Money`].

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors raised while parsing price strings.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// The value was not in the `AMOUNT CURRENCY` format or the amount was not a number.
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// The currency code is not one the store trades in.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Round to the nearest whole currency unit.
///
/// Halves round towards positive infinity (`2.5 -> 3`, `-2.5 -> -2`), never to even.
pub fn round_currency(amount: Decimal) -> Decimal {
    (amount + Decimal::new(5, 1)).floor()
}

/// The given percentage of `base`.
///
/// Callers must pass a non-negative base and percentage.
pub fn percent_of(base: Decimal, percent: Percentage) -> Decimal {
    percent * base
}

/// Limit `value` to `cap` when a cap is present.
pub fn apply_cap(value: Decimal, cap: Option<Decimal>) -> Decimal {
    match cap {
        Some(cap) if value > cap => cap,
        _ => value,
    }
}

/// Convert a percentage-points value (`10` for 10%) into a [`Percentage`].
pub fn percentage_from_points(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Convert a [`Percentage`] back into percentage points.
pub fn percentage_points(percent: Percentage) -> Decimal {
    percent * Decimal::ONE_HUNDRED
}

/// The amount of `money` in major units, e.g. `199.50`.
pub fn amount_of(money: &Money<'_, Currency>) -> Decimal {
    Decimal::new(money.to_minor_units(), money.currency().exponent)
}

/// Build [`Money`] from an amount in major units.
///
/// Sub-minor precision is rounded half away from zero. Amounts beyond the minor unit range
/// saturate.
pub fn money_from_amount(amount: Decimal, currency: &Currency) -> Money<'_, Currency> {
    let scale = Decimal::from(10_i64.pow(currency.exponent));

    let minor = amount
        .checked_mul(scale)
        .map(|minor| minor.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|minor| minor.to_i64())
        .unwrap_or(if amount.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });

    Money::from_minor(minor, currency)
}

/// [`round_currency`] lifted to [`Money`].
pub fn round_money<'a>(money: &Money<'a, Currency>) -> Money<'a, Currency> {
    money_from_amount(round_currency(amount_of(money)), money.currency())
}

/// Zero in the given currency.
pub fn zero(currency: &Currency) -> Money<'_, Currency> {
    Money::from_minor(0, currency)
}

/// Check that `money` is denominated in `expected`.
///
/// # Errors
///
/// Returns [`MoneyError::CurrencyMismatch`] when the currencies differ.
pub fn ensure_currency(expected: &Currency, money: &Money<'_, Currency>) -> Result<(), MoneyError> {
    if money.currency() == expected {
        Ok(())
    } else {
        Err(MoneyError::CurrencyMismatch {
            expected: expected.iso_alpha_code,
            actual: money.currency().iso_alpha_code,
        })
    }
}

/// How far `price` sits below `mrp`, as a fraction of `mrp`.
///
/// Zero when the MRP is zero or not above the price. Display only; never used in totals.
pub fn mrp_savings(price: &Money<'_, Currency>, mrp: &Money<'_, Currency>) -> Percentage {
    let price = amount_of(price);
    let mrp = amount_of(mrp);

    if mrp <= Decimal::ZERO || mrp <= price {
        return Percentage::from(Decimal::ZERO);
    }

    Percentage::from((mrp - price) / mrp)
}

/// Resolve a currency code the store trades in.
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] for any other code.
pub fn parse_currency(code: &str) -> Result<&'static Currency, PriceError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => Ok(iso::INR),
        "USD" => Ok(iso::USD),
        "GBP" => Ok(iso::GBP),
        "EUR" => Ok(iso::EUR),
        other => Err(PriceError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a price string (e.g. `"199.50 INR"`).
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if the amount is not a
/// decimal number, or if the currency is not recognised.
pub fn parse_price(s: &str) -> Result<Money<'static, Currency>, PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidPrice(s.to_string()))?;

    let currency = parse_currency(code)?;

    Ok(money_from_amount(amount, currency))
}

/// Format money the way [`parse_price`] reads it.
pub fn format_price(money: &Money<'_, Currency>) -> String {
    format!("{} {}", amount_of(money), money.currency().iso_alpha_code)
}
