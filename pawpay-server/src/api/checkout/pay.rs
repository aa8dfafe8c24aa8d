use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use compact_str::CompactString;
use pawpay_core::gateway::GatewayResult;
use pawpay_sdk::objects::checkout::{GatewayErrorBody, PaymentFailureBody, PaymentSuccessBody};

use super::CheckoutApiError;
use crate::state::AppState;

/// `POST /checkout/{order_id}/pay` — run the authorization attempt.
///
/// Moves the session to `processing` (one attempt at a time), runs the
/// gateway draw, then lands the session in `succeeded` or `failed`.
/// Success returns the id/payment/signature triple the platform verifies;
/// failure returns 402 with the fixed-shape error body the page reports
/// back through `POST /payments/payment-failure`.
pub(super) async fn pay(
    state: State<AppState>,
    Path(order_id): Path<CompactString>,
) -> Result<axum::response::Response, CheckoutApiError> {
    state
        .sessions
        .with_session(&order_id, |session| session.begin_processing())
        .await
        .ok_or(CheckoutApiError::NoSession)?
        .map_err(CheckoutApiError::Session)?;

    match state.gateway.authorize(&order_id).await {
        GatewayResult::Succeeded {
            order_id,
            payment_id,
            signature,
        } => {
            let updated = state
                .sessions
                .with_session(&order_id, |session| {
                    session.finish_succeeded(payment_id.clone());
                    Ok(())
                })
                .await;
            if updated.is_none() {
                tracing::debug!(order_id = %order_id, "session removed during processing");
            }

            Ok(Json(PaymentSuccessBody {
                order_id,
                payment_id,
                signature,
            })
            .into_response())
        }
        GatewayResult::Failed { order_id, error } => {
            let updated = state
                .sessions
                .with_session(&order_id, |session| {
                    session.finish_failed(error.reason.clone());
                    Ok(())
                })
                .await;
            if updated.is_none() {
                tracing::debug!(order_id = %order_id, "session removed during processing");
            }

            let body = PaymentFailureBody {
                error: GatewayErrorBody {
                    code: error.code,
                    description: error.description,
                    source: error.source,
                    step: error.step,
                    reason: error.reason,
                },
                order_id,
            };
            Ok((StatusCode::PAYMENT_REQUIRED, Json(body)).into_response())
        }
    }
}
