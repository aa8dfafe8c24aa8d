use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use compact_str::CompactString;

use super::{CheckoutApiError, to_response};
use crate::state::AppState;

/// `GET /checkout/{order_id}` — read current session state.
///
/// Does not reset the session's idle clock, so polling alone never keeps
/// an abandoned session alive.
pub(super) async fn get_session(
    state: State<AppState>,
    Path(order_id): Path<CompactString>,
) -> Result<impl IntoResponse, CheckoutApiError> {
    let session = state
        .sessions
        .get(&order_id)
        .await
        .ok_or(CheckoutApiError::NoSession)?;

    Ok(Json(to_response(&session)))
}
