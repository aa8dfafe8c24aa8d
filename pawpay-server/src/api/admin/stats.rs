use axum::{Json, response::IntoResponse};
use kanau::processor::Processor;
use pawpay_core::entities::donation_records::GetDonationStats;
use pawpay_sdk::objects::admin::DonationStatsResponse;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::AdminApiError;

/// `GET /stats` — donation totals and counts.
///
/// `total_amount_minor` sums successful donations only; the failure count
/// comes from the failure log.
pub async fn stats(
    state: axum::extract::State<AppState>,
    _auth: AdminAuth,
) -> Result<impl IntoResponse, AdminApiError> {
    let stats = state
        .ledger
        .process(GetDonationStats)
        .await
        .map_err(AdminApiError::Database)?;

    Ok(Json(DonationStatsResponse {
        total_donations: stats.total_donations,
        total_amount_minor: stats.total_amount_minor,
        one_time_count: stats.one_time_count,
        monthly_count: stats.monthly_count,
        failed_payments: stats.failed_payments,
    }))
}
