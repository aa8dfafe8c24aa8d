use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use compact_str::CompactString;
use pawpay_sdk::objects::checkout::SelectMethodRequest;

use super::{CheckoutApiError, to_response};
use crate::state::AppState;

/// `POST /checkout/{order_id}/method` — choose card / upi / netbanking.
///
/// Net-banking skips detail collection; re-selecting drops any details
/// already submitted.
pub(super) async fn select_method(
    state: State<AppState>,
    Path(order_id): Path<CompactString>,
    Json(body): Json<SelectMethodRequest>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let session = state
        .sessions
        .with_session(&order_id, |session| {
            session.select_method(body.method)?;
            Ok(session.clone())
        })
        .await
        .ok_or(CheckoutApiError::NoSession)?
        .map_err(CheckoutApiError::Session)?;

    Ok(Json(to_response(&session)))
}
