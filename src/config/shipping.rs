//! Shipping Config

use clap::Args;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::Deserialize;

use crate::{money::money_from_amount, totals::ShippingPolicy};

/// Shipping policy settings, in major units of the store currency.
#[derive(Debug, Clone, Args, Deserialize)]
pub struct ShippingConfig {
    /// Subtotal at or above which shipping is free
    #[arg(
        long,
        env = "FREE_SHIPPING_THRESHOLD",
        default_value = "499",
        value_parser = parse_amount
    )]
    pub free_shipping_threshold: Decimal,

    /// Shipping charge below the threshold
    #[arg(
        long,
        env = "FLAT_SHIPPING_CHARGE",
        default_value = "49",
        value_parser = parse_amount
    )]
    pub flat_shipping_charge: Decimal,
}

impl ShippingConfig {
    /// The configured policy in `currency`.
    pub fn policy<'a>(&self, currency: &'a Currency) -> ShippingPolicy<'a> {
        ShippingPolicy::new(
            money_from_amount(self.free_shipping_threshold, currency),
            money_from_amount(self.flat_shipping_charge, currency),
        )
    }
}

fn parse_amount(raw: &str) -> Result<Decimal, String> {
    let amount = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|error| format!("{raw:?} is not an amount: {error}"))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("{raw:?} must not be negative"));
    }

    Ok(amount)
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::INR};

    use super::*;

    #[test]
    fn policy_uses_store_currency() {
        let config = ShippingConfig {
            free_shipping_threshold: Decimal::from(499),
            flat_shipping_charge: Decimal::from(49),
        };

        assert_eq!(
            config.policy(INR),
            ShippingPolicy::new(Money::from_minor(49_900, INR), Money::from_minor(4_900, INR))
        );
    }

    #[test]
    fn parse_amount_accepts_decimals_and_rejects_garbage() {
        assert_eq!(parse_amount("12.50"), Ok(Decimal::new(1_250, 2)));
        assert!(parse_amount("twelve").is_err());
        assert!(parse_amount("-0.01").is_err());
    }
}
