//! Application state shared across all request handlers.

use pawpay_core::checkout::SessionStore;
use pawpay_core::config::SharedConfig;
use pawpay_core::events::EventSenders;
use pawpay_core::gateway::PaymentGateway;
use pawpay_core::ledger::Ledger;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend for orders, donations and failures.
    pub ledger: Arc<Ledger>,
    /// Live checkout sessions keyed by order id.
    pub sessions: SessionStore,
    /// The authorization backend used by the pay endpoint.
    pub gateway: Arc<dyn PaymentGateway>,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Senders for emitting events to background processors.
    pub event_senders: EventSenders,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(
        ledger: Arc<Ledger>,
        sessions: SessionStore,
        gateway: Arc<dyn PaymentGateway>,
        config: SharedConfig,
        event_senders: EventSenders,
    ) -> Self {
        Self {
            ledger,
            sessions,
            gateway,
            config,
            event_senders,
        }
    }
}
