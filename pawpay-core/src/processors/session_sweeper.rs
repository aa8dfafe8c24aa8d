//! SessionSweeper processor.
//!
//! Walks the checkout session store on a fixed interval and evicts
//! sessions that have sat idle past the configured TTL. A donor who walks
//! away mid-checkout does not pin memory forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use tracing::info;

use crate::checkout::SessionStore;
use crate::config::GatewayConfig;

/// How often the sweeper scans the session store.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// SessionSweeper evicts idle checkout sessions.
pub struct SessionSweeper {
    sessions: SessionStore,
    config: Arc<RwLock<GatewayConfig>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SessionSweeper {
    /// Create a new SessionSweeper.
    pub fn new(
        sessions: SessionStore,
        config: Arc<RwLock<GatewayConfig>>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            sessions,
            config,
            shutdown_rx,
        }
    }

    /// Run the SessionSweeper.
    ///
    /// The idle TTL is re-read from config on every sweep, so a config
    /// reload takes effect without a restart.
    pub async fn run(mut self) {
        info!("SessionSweeper started");

        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("SessionSweeper received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    let ttl = Duration::from_secs(self.config.read().await.session_idle_secs);
                    let evicted = self.sessions.evict_idle(ttl).await;
                    if evicted > 0 {
                        info!(evicted, "Evicted idle checkout sessions");
                    }
                }
            }
        }

        info!("SessionSweeper shutdown complete");
    }
}
