//! Checkout session wire types.
//!
//! The hosted checkout walks a session through method selection, detail
//! collection and payment. These types mirror the server-side state machine
//! one to one so a client can always render the current step.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use super::Currency;

/// Payment instrument families the simulated gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Netbanking,
}

/// Instrument details collected before authorization.
///
/// Netbanking needs no details, so it has no variant here; a netbanking
/// session goes straight from method selection to ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentDetails {
    Card {
        number: String,
        expiry: String,
        cvv: String,
        holder: String,
    },
    Upi {
        vpa: String,
    },
}

impl PaymentDetails {
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentDetails::Card { .. } => PaymentMethod::Card,
            PaymentDetails::Upi { .. } => PaymentMethod::Upi,
        }
    }
}

/// Where a checkout session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    ChoosingMethod,
    CollectingDetails,
    ReadyToProcess,
    Processing,
    Succeeded,
    Failed,
}

/// Request payload for `POST /checkout/{order_id}/method`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectMethodRequest {
    pub method: PaymentMethod,
}

/// Snapshot of a checkout session returned by every checkout endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub order_id: CompactString,
    pub stage: SessionStage,
    pub method: Option<PaymentMethod>,
    pub amount: i64,
    pub amount_display: rust_decimal::Decimal,
    pub currency: Currency,
}

/// Successful authorization body, shaped like the original gateway handoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSuccessBody {
    #[serde(rename = "razorpay_order_id")]
    pub order_id: CompactString,
    #[serde(rename = "razorpay_payment_id")]
    pub payment_id: CompactString,
    #[serde(rename = "razorpay_signature")]
    pub signature: String,
}

/// Error descriptor embedded in a declined payment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayErrorBody {
    pub code: CompactString,
    pub description: String,
    pub source: CompactString,
    pub step: CompactString,
    pub reason: CompactString,
}

/// Declined payment body returned with status 402.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFailureBody {
    pub error: GatewayErrorBody,
    pub order_id: CompactString,
}
