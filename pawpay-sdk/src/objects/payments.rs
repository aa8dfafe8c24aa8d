//! Payment verification and failure-report types.
//!
//! The verification endpoint keeps the wire field names of the original
//! platform contract (`razorpay_order_id`, `razorpay_payment_id`,
//! `razorpay_signature`); internal names stay clean via `#[serde(rename)]`.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::DonationType;

/// Donor context captured by the donation dialog and echoed into
/// verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    pub donation_type: DonationType,
}

/// Request payload for `POST /payments/verify-payment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(rename = "razorpay_order_id")]
    pub order_id: CompactString,
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: CompactString,
    #[serde(rename = "razorpay_signature")]
    pub signature: String,
    pub donation_details: DonorDetails,
}

/// Response returned by the verification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub donation_id: Option<Uuid>,
    pub message: Option<String>,
}

/// Gateway failure payload reported by the donation dialog to
/// `POST /payments/payment-failure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentFailureReport {
    pub error_code: CompactString,
    pub error_description: String,
    pub error_source: CompactString,
    pub error_step: CompactString,
    pub error_reason: CompactString,
    pub order_id: CompactString,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn verify_request_keeps_original_wire_field_names() {
        let json = r#"{
            "razorpay_order_id": "order_abc",
            "razorpay_payment_id": "pay_def",
            "razorpay_signature": "sig",
            "donation_details": {
                "name": "Asha",
                "email": "asha@example.com",
                "phone": "+911234567890",
                "donation_type": "one-time"
            }
        }"#;
        let parsed: VerifyPaymentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.order_id, "order_abc");
        assert_eq!(parsed.payment_id, "pay_def");
        assert_eq!(parsed.donation_details.donation_type, DonationType::OneTime);
        assert_eq!(parsed.donation_details.address, None);

        let out = serde_json::to_string(&parsed).unwrap();
        assert!(out.contains("razorpay_order_id"));
        assert!(out.contains("razorpay_payment_id"));
        assert!(out.contains("razorpay_signature"));
    }

    #[test]
    fn failure_report_round_trips() {
        let report = PaymentFailureReport {
            error_code: "BAD_REQUEST_ERROR".into(),
            error_description: "Payment failed".into(),
            error_source: "gateway".into(),
            error_step: "payment_authorization".into(),
            error_reason: "payment_failed".into(),
            order_id: "order_abc".into(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let parsed: PaymentFailureReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
