//! FailureLogger processor.
//!
//! Drains [`FailureReported`] events into the ledger. The endpoint that
//! accepts failure reports acknowledges before the write happens; this
//! processor is the component that actually records them.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::events::{FailureReported, FailureReportedReceiver};
use crate::flow;
use crate::ledger::Ledger;

/// FailureLogger persists gateway failure reports in the background.
pub struct FailureLogger {
    ledger: Arc<Ledger>,
    failure_rx: FailureReportedReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl FailureLogger {
    /// Create a new FailureLogger.
    pub fn new(
        ledger: Arc<Ledger>,
        failure_rx: FailureReportedReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            ledger,
            failure_rx,
            shutdown_rx,
        }
    }

    /// Run the FailureLogger.
    ///
    /// Listens for FailureReported events and writes a failure record for
    /// each one. Exits when the shutdown signal is received or the event
    /// channel closes.
    pub async fn run(mut self) {
        info!("FailureLogger started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("FailureLogger received shutdown signal");
                        break;
                    }
                }

                Some(event) = self.failure_rx.recv() => {
                    debug!(order_id = %event.report.order_id, "Received FailureReported event");
                    if let Err(e) = self.process_event(event).await {
                        error!(error = %e, "Failed to record gateway failure");
                    }
                }

                else => {
                    info!("FailureReported channel closed");
                    break;
                }
            }
        }

        // Reports accepted before shutdown still get written.
        while let Ok(event) = self.failure_rx.try_recv() {
            if let Err(e) = self.process_event(event).await {
                error!(error = %e, "Failed to record gateway failure");
            }
        }

        info!("FailureLogger shutdown complete");
    }

    async fn process_event(&self, event: FailureReported) -> Result<(), crate::ledger::LedgerError> {
        flow::log_gateway_failure(self.ledger.as_ref(), event.report).await?;
        Ok(())
    }
}
