//! Order construction.
//!
//! An order is the unit a donation is settled against. Amounts are carried
//! in minor units (paise, cents) end to end; display conversion happens at
//! the API edge.

use std::collections::BTreeMap;

use crate::entities::CurrencyCode;
use crate::entities::order_records::InsertOrderRecord;
use crate::utils::{ids, now_time};

/// A request to create an order, after DTO decoding.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub amount: i64,
    pub currency: CurrencyCode,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateOrderError {
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),
}

/// Build an insertable order from a creation request.
///
/// Rejects non-positive amounts; everything else is taken as-is and the
/// order gets a fresh `order_…` identifier and creation timestamp.
pub fn build_order(req: CreateOrder) -> Result<InsertOrderRecord, CreateOrderError> {
    if req.amount <= 0 {
        return Err(CreateOrderError::InvalidAmount(req.amount));
    }
    Ok(InsertOrderRecord {
        order_id: ids::new_order_id(),
        amount: req.amount,
        currency: req.currency,
        receipt: req.receipt,
        notes: req.notes,
        created_at: now_time(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;

    fn request(amount: i64) -> CreateOrder {
        CreateOrder {
            amount,
            currency: CurrencyCode::Inr,
            receipt: "receipt#42".to_string(),
            notes: BTreeMap::from([("campaign".to_string(), "winter".to_string())]),
        }
    }

    #[test]
    fn positive_amount_builds_prefixed_order() {
        let Ok(order) = build_order(request(50_000)) else {
            panic!("expected order");
        };
        assert!(order.order_id.starts_with("order_"));
        assert_eq!(order.amount, 50_000);
        assert_eq!(order.receipt, "receipt#42");
        assert_eq!(order.notes.get("campaign").map(String::as_str), Some("winter"));
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(matches!(
            build_order(request(0)),
            Err(CreateOrderError::InvalidAmount(0))
        ));
        assert!(matches!(
            build_order(request(-500)),
            Err(CreateOrderError::InvalidAmount(-500))
        ));
    }

    #[test]
    fn each_order_gets_a_distinct_id() {
        let a = build_order(request(100)).map(|o| o.order_id);
        let b = build_order(request(100)).map(|o| o.order_id);
        assert_ne!(a.ok(), b.ok());
    }
}
