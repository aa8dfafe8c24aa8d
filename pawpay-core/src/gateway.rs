//! Simulated payment gateway.
//!
//! [`PaymentGateway`] is the seam between the checkout flow and whatever
//! actually moves money. The bundled [`SimulatedGateway`] moves none: it
//! waits a configured delay, draws success with a configured probability,
//! and on success signs the payment the same way a real gateway callback
//! would.

use std::sync::Arc;
use std::time::Duration;

use compact_str::CompactString;
use pawpay_sdk::objects::payments::PaymentFailureReport;
use pawpay_sdk::signature;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, RwLock};

use crate::config::GatewayConfig;
use crate::utils::ids;

/// Error code attached to every declined payment.
pub const FAILURE_CODE: &str = "BAD_REQUEST_ERROR";
/// Failure origin reported to the donation page.
pub const FAILURE_SOURCE: &str = "gateway";
/// Step at which a simulated decline happens.
pub const FAILURE_STEP: &str = "payment_authorization";
/// Machine-readable decline reason.
pub const FAILURE_REASON: &str = "payment_failed";

/// The fixed-shape error payload of a declined payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayFailure {
    pub code: CompactString,
    pub description: String,
    pub source: CompactString,
    pub step: CompactString,
    pub reason: CompactString,
}

impl GatewayFailure {
    /// The one decline shape the simulated gateway produces.
    pub fn declined() -> Self {
        Self {
            code: FAILURE_CODE.into(),
            description: "Payment failed".to_string(),
            source: FAILURE_SOURCE.into(),
            step: FAILURE_STEP.into(),
            reason: FAILURE_REASON.into(),
        }
    }

    /// Shape this failure as the wire report the donation page sends to
    /// the failure endpoint.
    pub fn to_report(&self, order_id: CompactString) -> PaymentFailureReport {
        PaymentFailureReport {
            error_code: self.code.clone(),
            error_description: self.description.clone(),
            error_source: self.source.clone(),
            error_step: self.step.clone(),
            error_reason: self.reason.clone(),
            order_id,
        }
    }
}

/// Outcome of one authorization attempt.
#[derive(Debug, Clone)]
pub enum GatewayResult {
    Succeeded {
        order_id: CompactString,
        payment_id: CompactString,
        signature: String,
    },
    Failed {
        order_id: CompactString,
        error: GatewayFailure,
    },
}

/// An authorization backend. Object-safe so the server can hold
/// `Arc<dyn PaymentGateway>` and swap implementations.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Run one authorization attempt for an order.
    async fn authorize(&self, order_id: &str) -> GatewayResult;
}

// ---------------------------------------------------------------------------
// SimulatedGateway
// ---------------------------------------------------------------------------

/// The demo gateway: no money moves, outcomes are drawn at random.
///
/// Success rate and processing delay are read from shared config on every
/// attempt, so a config reload applies without restart.
pub struct SimulatedGateway {
    config: Arc<RwLock<GatewayConfig>>,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    pub fn new(config: Arc<RwLock<GatewayConfig>>) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic draws for tests.
    pub fn with_seed(config: Arc<RwLock<GatewayConfig>>, seed: u64) -> Self {
        Self {
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn authorize(&self, order_id: &str) -> GatewayResult {
        let (secret, success_rate, delay_ms) = {
            let config = self.config.read().await;
            (
                config.secret.clone(),
                config.success_rate,
                config.processing_delay_ms,
            )
        };

        // Dropping the future during the sleep just discards the attempt;
        // nothing has been signed or recorded yet.
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        let authorized = {
            let mut rng = self.rng.lock().await;
            rand::Rng::random_bool(&mut *rng, success_rate.clamp(0.0, 1.0))
        };

        if authorized {
            let payment_id = ids::new_payment_id();
            let signature = signature::sign_payment(order_id, &payment_id, &secret);
            tracing::info!(order_id, payment_id = %payment_id, "payment authorized");
            GatewayResult::Succeeded {
                order_id: order_id.into(),
                payment_id,
                signature,
            }
        } else {
            tracing::info!(order_id, "payment declined");
            GatewayResult::Failed {
                order_id: order_id.into(),
                error: GatewayFailure::declined(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;

    const SECRET: &[u8] = b"test-gateway-secret";

    fn config(success_rate: f64) -> Arc<RwLock<GatewayConfig>> {
        Arc::new(RwLock::new(GatewayConfig::new(SECRET, success_rate, 0, 900)))
    }

    #[tokio::test]
    async fn authorized_payments_carry_a_verifiable_signature() {
        let gateway = SimulatedGateway::with_seed(config(1.0), 7);
        match gateway.authorize("order_sig").await {
            GatewayResult::Succeeded {
                order_id,
                payment_id,
                signature: sig,
            } => {
                assert!(payment_id.starts_with("pay_"));
                assert!(
                    signature::verify_payment_signature(&order_id, &payment_id, &sig, SECRET)
                        .is_ok()
                );
            }
            GatewayResult::Failed { .. } => panic!("rate 1.0 must authorize"),
        }
    }

    #[tokio::test]
    async fn declined_payments_use_the_fixed_error_shape() {
        let gateway = SimulatedGateway::with_seed(config(0.0), 7);
        match gateway.authorize("order_fail").await {
            GatewayResult::Failed { order_id, error } => {
                assert_eq!(order_id, "order_fail");
                assert_eq!(error, GatewayFailure::declined());
                assert_eq!(error.code, FAILURE_CODE);
                assert_eq!(error.step, FAILURE_STEP);
            }
            GatewayResult::Succeeded { .. } => panic!("rate 0.0 must decline"),
        }
    }

    #[tokio::test]
    async fn seeded_draw_rate_stays_near_the_configured_probability() {
        let gateway = SimulatedGateway::with_seed(config(0.9), 42);
        let mut successes = 0u32;
        for n in 0..10_000 {
            let order_id = format!("order_{n}");
            if matches!(
                gateway.authorize(&order_id).await,
                GatewayResult::Succeeded { .. }
            ) {
                successes += 1;
            }
        }
        assert!(
            (8_800..=9_200).contains(&successes),
            "observed {successes} successes in 10_000 draws"
        );
    }

    #[tokio::test]
    async fn success_rate_is_read_live_from_config() {
        let shared = config(1.0);
        let gateway = SimulatedGateway::with_seed(shared.clone(), 1);
        assert!(matches!(
            gateway.authorize("order_a").await,
            GatewayResult::Succeeded { .. }
        ));
        shared.write().await.success_rate = 0.0;
        assert!(matches!(
            gateway.authorize("order_b").await,
            GatewayResult::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn out_of_range_rates_are_clamped() {
        let gateway = SimulatedGateway::with_seed(config(7.5), 3);
        assert!(matches!(
            gateway.authorize("order_hi").await,
            GatewayResult::Succeeded { .. }
        ));
        let gateway = SimulatedGateway::with_seed(config(-3.0), 3);
        assert!(matches!(
            gateway.authorize("order_lo").await,
            GatewayResult::Failed { .. }
        ));
    }
}
