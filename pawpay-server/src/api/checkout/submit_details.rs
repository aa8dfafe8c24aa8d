use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use compact_str::CompactString;
use pawpay_sdk::objects::checkout::PaymentDetails;

use super::{CheckoutApiError, to_response};
use crate::state::AppState;

/// `POST /checkout/{order_id}/details` — submit card or UPI details.
///
/// The body is the tagged `PaymentDetails` object and must match the
/// selected method. Details are validated but never stored beyond the
/// session.
pub(super) async fn submit_details(
    state: State<AppState>,
    Path(order_id): Path<CompactString>,
    Json(details): Json<PaymentDetails>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let session = state
        .sessions
        .with_session(&order_id, |session| {
            session.submit_details(details)?;
            Ok(session.clone())
        })
        .await
        .ok_or(CheckoutApiError::NoSession)?
        .map_err(CheckoutApiError::Session)?;

    Ok(Json(to_response(&session)))
}
