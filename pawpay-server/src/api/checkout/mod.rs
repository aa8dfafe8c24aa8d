//! Checkout API handlers.
//!
//! These endpoints are called by the donation page in the donor's browser
//! and drive one checkout session per order through the simulated gateway.
//!
//! # Endpoints
//!
//! - `POST /checkout/{order_id}/session` – open (or rejoin) the session
//! - `GET  /checkout/{order_id}`         – read current session state
//! - `POST /checkout/{order_id}/method`  – choose card / upi / netbanking
//! - `POST /checkout/{order_id}/details` – submit card or UPI details
//! - `POST /checkout/{order_id}/pay`     – run the authorization attempt
//! - `POST /checkout/{order_id}/cancel`  – abandon the session

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use pawpay_core::checkout::{CheckoutError, CheckoutSession};
use pawpay_core::ledger::LedgerError;
use pawpay_sdk::objects::checkout::CheckoutSessionResponse;
use pawpay_sdk::objects::orders::display_amount;

use crate::state::AppState;

mod cancel;
mod get_session;
mod open_session;
mod pay;
mod select_method;
mod submit_details;

/// Build the Checkout API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{order_id}/session", post(open_session::open_session))
        .route("/{order_id}", get(get_session::get_session))
        .route("/{order_id}/method", post(select_method::select_method))
        .route("/{order_id}/details", post(submit_details::submit_details))
        .route("/{order_id}/pay", post(pay::pay))
        .route("/{order_id}/cancel", post(cancel::cancel))
}

/// Convert a `CheckoutSession` (core model) into a `CheckoutSessionResponse`
/// (API model).
fn to_response(session: &CheckoutSession) -> CheckoutSessionResponse {
    CheckoutSessionResponse {
        order_id: session.order_id.clone(),
        stage: (&session.stage).into(),
        method: session.stage.method(),
        amount: session.amount,
        amount_display: display_amount(session.amount),
        currency: session.currency.into(),
    }
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Checkout API handlers.
#[derive(Debug)]
enum CheckoutApiError {
    /// No order exists for the id in the path.
    UnknownOrder,
    /// No live session exists for the order.
    NoSession,
    /// A session transition was rejected.
    Session(CheckoutError),
    /// A database query failed.
    Database(LedgerError),
}

impl IntoResponse for CheckoutApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            CheckoutApiError::UnknownOrder => {
                (StatusCode::NOT_FOUND, "order not found").into_response()
            }
            CheckoutApiError::NoSession => {
                (StatusCode::NOT_FOUND, "no checkout session for this order").into_response()
            }
            CheckoutApiError::Session(e) => {
                let status = match e {
                    CheckoutError::AlreadyProcessing | CheckoutError::SessionClosed => {
                        StatusCode::CONFLICT
                    }
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.to_string()).into_response()
            }
            CheckoutApiError::Database(e) => {
                tracing::error!(error = %e, "Checkout API database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
