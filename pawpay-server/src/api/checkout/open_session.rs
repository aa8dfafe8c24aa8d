use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use compact_str::CompactString;
use kanau::processor::Processor;
use pawpay_core::entities::order_records::GetOrderRecordById;

use super::{CheckoutApiError, to_response};
use crate::state::AppState;

/// `POST /checkout/{order_id}/session` — open (or rejoin) the session.
///
/// Idempotent: posting again for the same order returns the existing
/// session untouched except for its idle clock.
pub(super) async fn open_session(
    state: State<AppState>,
    Path(order_id): Path<CompactString>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let record = state
        .ledger
        .process(GetOrderRecordById {
            order_id: order_id.clone(),
        })
        .await
        .map_err(CheckoutApiError::Database)?
        .ok_or(CheckoutApiError::UnknownOrder)?;

    let session = state
        .sessions
        .open(record.order_id, record.amount, record.currency)
        .await;

    Ok(Json(to_response(&session)))
}
