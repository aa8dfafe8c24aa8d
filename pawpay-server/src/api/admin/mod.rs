//! Admin API handlers.
//!
//! These endpoints are called by the fundraising team's dashboard and
//! require the `Pawpay-Admin-Authorization` header with the plaintext
//! admin secret.
//!
//! # Endpoints
//!
//! - `GET /donations` – list donations (paginated, filterable)
//! - `GET /failures`  – list failure reports (paginated, filterable)
//! - `GET /stats`     – donation totals and counts

use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
use pawpay_core::ledger::LedgerError;

use crate::state::AppState;

mod list_donations;
mod list_failures;
mod stats;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/donations", get(list_donations::list_donations))
        .route("/failures", get(list_failures::list_failures))
        .route("/stats", get(stats::stats))
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) enum AdminApiError {
    Database(LedgerError),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::Database(e) => {
                tracing::error!(error = %e, "Admin API database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

use pawpay_core::entities::donation_records::DonationRecord;
use pawpay_core::entities::failure_records::FailureRecord;
use pawpay_sdk::objects::admin::{AdminDonationResponse, AdminFailureResponse};

pub(crate) fn donation_to_admin_response(r: &DonationRecord) -> AdminDonationResponse {
    AdminDonationResponse {
        id: r.id,
        order_id: r.order_id.clone(),
        payment_id: r.payment_id.clone(),
        donor_name: r.donor_name.clone(),
        donor_email: r.donor_email.clone(),
        donor_phone: r.donor_phone.clone(),
        donor_address: r.donor_address.clone(),
        amount: r.amount,
        currency: r.currency.into(),
        donation_type: r.donation_type.into(),
        payment_status: r.payment_status.into(),
        created_at: r.created_at.assume_utc().unix_timestamp(),
    }
}

pub(crate) fn failure_to_admin_response(r: &FailureRecord) -> AdminFailureResponse {
    AdminFailureResponse {
        id: r.id,
        order_id: r.order_id.clone(),
        error_code: r.error_code.clone(),
        error_description: r.error_description.clone(),
        error_source: r.error_source.clone(),
        error_step: r.error_step.clone(),
        error_reason: r.error_reason.clone(),
        reported_at: r.reported_at.assume_utc().unix_timestamp(),
    }
}
