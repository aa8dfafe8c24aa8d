//! Order creation request and response types.
//!
//! Sent by the adoption platform backend to `POST /payments/create-order`.
//! Amounts travel as integers in minor currency units (paise, cents);
//! [`display_amount`] is the single place the minor → display conversion
//! is defined.

use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::Currency;

/// Request payload for creating a new donation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Donation amount in minor currency units.
    pub amount: i64,
    pub currency: Currency,
    /// Opaque receipt label chosen by the caller.
    #[serde(default)]
    pub receipt: String,
    /// Opaque key-value annotations stored with the order.
    #[serde(default)]
    pub notes: BTreeMap<String, String>,
}

/// An order as presented on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBody {
    pub id: CompactString,
    /// Amount in minor currency units.
    pub amount: i64,
    /// Amount in display units (minor units divided by 100).
    pub amount_display: rust_decimal::Decimal,
    pub currency: Currency,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
    /// Unix timestamp of when the order was created.
    pub created_at: i64,
}

/// Response returned by the create-order endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: OrderBody,
}

/// Convert a minor-unit amount into its display value (e.g. paise → rupees).
pub fn display_amount(minor: i64) -> rust_decimal::Decimal {
    rust_decimal::Decimal::new(minor, 2)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn display_amount_divides_by_one_hundred() {
        assert_eq!(display_amount(10000).to_string(), "100.00");
        assert_eq!(display_amount(501).to_string(), "5.01");
        assert_eq!(display_amount(1).to_string(), "0.01");
    }

    #[test]
    fn create_order_request_defaults_optional_fields() {
        let parsed: CreateOrderRequest =
            serde_json::from_str(r#"{"amount": 2500, "currency": "INR"}"#).unwrap();
        assert_eq!(parsed.amount, 2500);
        assert_eq!(parsed.currency, Currency::Inr);
        assert!(parsed.receipt.is_empty());
        assert!(parsed.notes.is_empty());
    }
}
