use axum::{
    Json,
    extract::{Path, State},
};
use compact_str::CompactString;
use pawpay_sdk::objects::Ack;

use crate::state::AppState;

/// `POST /checkout/{order_id}/cancel` — abandon the session.
///
/// Idempotent: cancelling an unknown or already-removed session still
/// acknowledges.
pub(super) async fn cancel(state: State<AppState>, Path(order_id): Path<CompactString>) -> Json<Ack> {
    if state.sessions.remove(&order_id).await {
        tracing::debug!(order_id = %order_id, "checkout session cancelled");
    }
    Json(Ack { success: true })
}
