use axum::{Json, extract::Query, response::IntoResponse};
use kanau::processor::Processor;
use pawpay_core::entities::donation_records::ListDonationRecords;
use pawpay_sdk::objects::admin::{ListDonationsQuery, clamp_pagination};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::{AdminApiError, donation_to_admin_response};

/// `GET /donations` — list donations with pagination and optional filters.
pub async fn list_donations(
    state: axum::extract::State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<ListDonationsQuery>,
) -> Result<impl IntoResponse, AdminApiError> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let records = state
        .ledger
        .process(ListDonationRecords {
            limit,
            offset,
            status: query.status.map(Into::into),
            donation_type: query.donation_type.map(Into::into),
        })
        .await
        .map_err(AdminApiError::Database)?;

    let response: Vec<_> = records.iter().map(donation_to_admin_response).collect();
    Ok(Json(response))
}
