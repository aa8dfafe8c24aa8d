//! Simulated gateway configuration.

/// Runtime configuration for the demo payment gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Secret key bytes for HMAC payment signing.
    pub secret: Box<[u8]>,
    /// Probability that an authorization attempt succeeds, in `0.0..=1.0`.
    pub success_rate: f64,
    /// Simulated processing delay before the authorization draw.
    pub processing_delay_ms: u64,
    /// Idle lifetime of a checkout session before it is swept.
    pub session_idle_secs: u64,
}

impl GatewayConfig {
    /// Create a new GatewayConfig.
    pub fn new(
        secret: impl Into<Box<[u8]>>,
        success_rate: f64,
        processing_delay_ms: u64,
        session_idle_secs: u64,
    ) -> Self {
        Self {
            secret: secret.into(),
            success_rate,
            processing_delay_ms,
            session_idle_secs,
        }
    }

    /// Get the secret key bytes for HMAC signing.
    pub fn secret_bytes(&self) -> &[u8] {
        &self.secret
    }
}
