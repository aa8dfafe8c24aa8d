//! Platform API handlers.
//!
//! These endpoints are called by the adoption platform's donation page
//! backend. The wire field names are kept compatible with the hosted
//! gateway the page originally integrated, so its calling code works
//! against this server unchanged.
//!
//! # Endpoints
//!
//! - `POST /payments/create-order`    – build an order for a donation amount
//! - `POST /payments/verify-payment`  – verify a claim and record the donation
//! - `POST /payments/payment-failure` – accept a declined-payment report

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use kanau::processor::Processor;
use pawpay_core::entities::order_records::OrderRecord;
use pawpay_core::events::FailureReported;
use pawpay_core::flow::{self, SettleError};
use pawpay_core::ledger::LedgerError;
use pawpay_core::orders::{self, CreateOrder, CreateOrderError};
use pawpay_core::verify::PaymentClaim;
use pawpay_sdk::objects::orders::{
    CreateOrderRequest, CreateOrderResponse, OrderBody, display_amount,
};
use pawpay_sdk::objects::payments::{
    PaymentFailureReport, VerifyPaymentRequest, VerifyPaymentResponse,
};
use pawpay_sdk::objects::{Ack, ErrorBody};

use crate::state::AppState;

/// Build the Platform API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/payments/create-order", post(create_order))
        .route("/payments/verify-payment", post(verify_payment))
        .route("/payments/payment-failure", post(payment_failure))
}

/// Convert an `OrderRecord` (DB model) into an `OrderBody` (API model).
fn to_body(record: &OrderRecord) -> OrderBody {
    OrderBody {
        id: record.order_id.clone(),
        amount: record.amount,
        amount_display: display_amount(record.amount),
        currency: record.currency.into(),
        receipt: record.receipt.clone(),
        notes: record.notes.0.clone(),
        created_at: record.created_at.assume_utc().unix_timestamp(),
    }
}

/// `POST /payments/create-order` — build an order for a donation amount.
///
/// Validates the amount, mints an order id and registers the order so a
/// later payment claim can be checked against it.
async fn create_order(
    state: axum::extract::State<AppState>,
    Json(body): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let insert = orders::build_order(CreateOrder {
        amount: body.amount,
        currency: body.currency.into(),
        receipt: body.receipt,
        notes: body.notes,
    })
    .map_err(PaymentsApiError::InvalidOrder)?;

    let record = state
        .ledger
        .process(insert)
        .await
        .map_err(PaymentsApiError::Persistence)?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            order: to_body(&record),
        }),
    ))
}

/// `POST /payments/verify-payment` — verify a claim and record the donation.
///
/// Runs the full settlement: load the order, check the HMAC signature,
/// then insert the donation keyed on the payment id. Replays of an
/// already-settled payment return the existing donation.
async fn verify_payment(
    state: axum::extract::State<AppState>,
    Json(body): Json<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, PaymentsApiError> {
    let secret = {
        let gateway = state.config.gateway.read().await;
        gateway.secret.clone()
    };

    let claim = PaymentClaim {
        order_id: body.order_id,
        payment_id: body.payment_id,
        signature: body.signature,
    };

    let record = flow::settle_verified_payment(
        state.ledger.as_ref(),
        claim,
        body.donation_details,
        &secret,
    )
    .await
    .map_err(|e| match e {
        SettleError::Verification(ve) => {
            tracing::info!(error = %ve, "payment verification rejected");
            PaymentsApiError::Verification
        }
        SettleError::Persistence(le) => PaymentsApiError::Persistence(le),
    })?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        donation_id: Some(record.id),
        message: None,
    }))
}

/// `POST /payments/payment-failure` — accept a declined-payment report.
///
/// Always acknowledges. The report is queued for the FailureLogger; a
/// full or closed channel loses the report but never the ack.
async fn payment_failure(
    state: axum::extract::State<AppState>,
    Json(report): Json<PaymentFailureReport>,
) -> Json<Ack> {
    if let Err(e) = state
        .event_senders
        .failure_reported
        .try_send(FailureReported { report })
    {
        tracing::error!(error = %e, "Failed to queue FailureReported event");
    }
    Json(Ack { success: true })
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Platform API handlers.
#[derive(Debug)]
enum PaymentsApiError {
    /// The order request failed validation.
    InvalidOrder(CreateOrderError),
    /// The payment claim failed verification. All verification failures
    /// share one generic response message; the detailed reason is only
    /// logged server-side.
    Verification,
    /// The ledger rejected a write; the caller should retry verification.
    Persistence(LedgerError),
}

impl IntoResponse for PaymentsApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            PaymentsApiError::InvalidOrder(e) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    success: false,
                    message: e.to_string(),
                }),
            )
                .into_response(),
            PaymentsApiError::Verification => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    success: false,
                    message: "payment verification failed".to_string(),
                }),
            )
                .into_response(),
            PaymentsApiError::Persistence(e) => {
                tracing::error!(error = %e, "Platform API database error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorBody {
                        success: false,
                        message: "donation could not be recorded, please retry".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}
