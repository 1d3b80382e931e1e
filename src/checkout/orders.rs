//! Orders
//!
//! The order payload submitted to the backend and the record it answers with.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{cart::CartLine, money::amount_of, products::ProductUuid};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in cash when the parcel arrives
    CashOnDelivery,

    /// Paid online before dispatch
    Online,
}

/// Where the order ships to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient name
    pub full_name: String,

    /// Contact number
    pub phone: String,

    /// Street address
    pub line1: String,

    /// Apartment, landmark
    #[serde(default)]
    pub line2: Option<String>,

    /// City
    pub city: String,

    /// State
    pub state: String,

    /// PIN / postal code
    pub postal_code: String,
}

impl ShippingAddress {
    /// The first required field that is blank, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("full_name", &self.full_name),
            ("phone", &self.phone),
            ("line1", &self.line1),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ]
        .into_iter()
        .find_map(|(field, value)| value.trim().is_empty().then_some(field))
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    /// Product id
    pub product_id: ProductUuid,

    /// Title at the time of ordering
    pub title: String,

    /// Variant, if any
    pub variant: Option<String>,

    /// Units ordered
    pub quantity: u32,

    /// Unit price in major units
    pub unit_price: Decimal,
}

impl From<&CartLine<'_>> for OrderItem {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            product_id: line.product(),
            title: line.title().to_string(),
            variant: line.variant().map(str::to_string),
            quantity: line.quantity(),
            unit_price: amount_of(line.price()),
        }
    }
}

/// Order payload submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Ordered lines
    pub items: Vec<OrderItem>,

    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// Subtotal before discount
    pub subtotal: Decimal,

    /// Coupon discount
    pub discount: Decimal,

    /// Shipping charge
    pub shipping_charge: Decimal,

    /// Payable amount
    pub grand_total: Decimal,

    /// ISO currency code of every amount
    pub currency: String,

    /// Applied coupon code
    pub coupon_code: Option<String>,

    /// Payment method
    pub payment_method: PaymentMethod,
}

/// Order record returned by the backend after submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlacedOrder {
    /// Server-generated order number
    pub order_number: String,

    /// When the backend created the order
    pub placed_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Asha Rao".to_string(),
            phone: "+91 98450 00000".to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            postal_code: "560001".to_string(),
        }
    }

    #[test]
    fn complete_address_has_no_missing_field() {
        assert_eq!(address().missing_field(), None);
    }

    #[test]
    fn first_blank_field_is_reported() {
        let address = ShippingAddress {
            city: " ".to_string(),
            postal_code: String::new(),
            ..address()
        };

        assert_eq!(address.missing_field(), Some("city"));
    }

    #[test]
    fn payment_method_uses_snake_case() -> TestResult {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery)?,
            r#""cash_on_delivery""#
        );

        Ok(())
    }

    #[test]
    fn placed_order_reads_backend_record() -> TestResult {
        let order: PlacedOrder = serde_json::from_str(
            r#"{"order_number": "ORD-20261019-0042", "placed_at": "2026-10-19T09:30:00Z"}"#,
        )?;

        assert_eq!(order.order_number, "ORD-20261019-0042");

        Ok(())
    }
}
