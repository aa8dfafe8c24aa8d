//! Payment verification.
//!
//! A claim is only trusted after the HMAC the gateway produced at
//! authorization time checks out against the same secret. Field presence
//! and order identity are checked before the signature.

use compact_str::CompactString;
use pawpay_sdk::signature;

use crate::entities::order_records::OrderRecord;

/// An asserted payment handoff, straight off the wire.
#[derive(Debug, Clone)]
pub struct PaymentClaim {
    pub order_id: CompactString,
    pub payment_id: CompactString,
    pub signature: String,
}

/// Why a claim was rejected. `MissingField` carries the wire field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("payment does not belong to this order")]
    OrderMismatch,
    #[error("signature verification failed")]
    SignatureMismatch,
    #[error("unknown order")]
    UnknownOrder,
}

/// Check a payment claim against its originating order and the gateway
/// secret.
///
/// Pure: no clock, no IO. The caller is responsible for loading the order
/// the claim says it belongs to.
pub fn verify_payment(
    order: &OrderRecord,
    claim: &PaymentClaim,
    secret: &[u8],
) -> Result<(), VerifyError> {
    if claim.order_id.is_empty() {
        return Err(VerifyError::MissingField("razorpay_order_id"));
    }
    if claim.payment_id.is_empty() {
        return Err(VerifyError::MissingField("razorpay_payment_id"));
    }
    if claim.signature.is_empty() {
        return Err(VerifyError::MissingField("razorpay_signature"));
    }
    if claim.order_id != order.order_id {
        return Err(VerifyError::OrderMismatch);
    }
    signature::verify_payment_signature(
        &claim.order_id,
        &claim.payment_id,
        &claim.signature,
        secret,
    )
    .map_err(|_| VerifyError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::entities::CurrencyCode;

    const SECRET: &[u8] = b"test-gateway-secret";

    fn order(order_id: &str) -> OrderRecord {
        let odt = time::OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        OrderRecord {
            order_id: order_id.into(),
            amount: 50_000,
            currency: CurrencyCode::Inr,
            receipt: String::new(),
            notes: sqlx::types::Json(Default::default()),
            created_at: time::PrimitiveDateTime::new(odt.date(), odt.time()),
        }
    }

    fn claim(order_id: &str, payment_id: &str) -> PaymentClaim {
        PaymentClaim {
            order_id: order_id.into(),
            payment_id: payment_id.into(),
            signature: signature::sign_payment(order_id, payment_id, SECRET),
        }
    }

    #[test]
    fn genuine_claim_verifies() {
        let order = order("order_1");
        assert_eq!(
            verify_payment(&order, &claim("order_1", "pay_1"), SECRET),
            Ok(())
        );
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let order = order("order_1");
        let mut bad = claim("order_1", "pay_1");
        bad.signature = signature::sign_payment("order_1", "pay_other", SECRET);
        assert_eq!(
            verify_payment(&order, &bad, SECRET),
            Err(VerifyError::SignatureMismatch)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let order = order("order_1");
        assert_eq!(
            verify_payment(&order, &claim("order_1", "pay_1"), b"other-secret"),
            Err(VerifyError::SignatureMismatch)
        );
    }

    #[test]
    fn claim_against_another_order_is_rejected() {
        let order = order("order_2");
        assert_eq!(
            verify_payment(&order, &claim("order_1", "pay_1"), SECRET),
            Err(VerifyError::OrderMismatch)
        );
    }

    #[test]
    fn empty_fields_name_the_wire_field() {
        let order = order("order_1");
        let mut c = claim("order_1", "pay_1");
        c.signature = String::new();
        assert_eq!(
            verify_payment(&order, &c, SECRET),
            Err(VerifyError::MissingField("razorpay_signature"))
        );

        let mut c = claim("order_1", "pay_1");
        c.payment_id = "".into();
        assert_eq!(
            verify_payment(&order, &c, SECRET),
            Err(VerifyError::MissingField("razorpay_payment_id"))
        );
    }
}
