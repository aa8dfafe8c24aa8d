use axum::{Json, extract::Query, response::IntoResponse};
use kanau::processor::Processor;
use pawpay_core::entities::failure_records::ListFailureRecords;
use pawpay_sdk::objects::admin::{ListFailuresQuery, clamp_pagination};

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

use super::{AdminApiError, failure_to_admin_response};

/// `GET /failures` — list failure reports, newest first.
pub async fn list_failures(
    state: axum::extract::State<AppState>,
    _auth: AdminAuth,
    Query(query): Query<ListFailuresQuery>,
) -> Result<impl IntoResponse, AdminApiError> {
    let (limit, offset) = clamp_pagination(query.limit, query.offset);

    let records = state
        .ledger
        .process(ListFailureRecords {
            limit,
            offset,
            order_id: query.order_id,
        })
        .await
        .map_err(AdminApiError::Database)?;

    let response: Vec<_> = records.iter().map(failure_to_admin_response).collect();
    Ok(Json(response))
}
