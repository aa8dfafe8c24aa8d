//! Event channels for background work.
//!
//! The payment-failure endpoint acknowledges immediately and hands the
//! report to the [`crate::processors::FailureLogger`] through a channel;
//! persistence happens off the request path.

use pawpay_sdk::objects::payments::PaymentFailureReport;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// Enough to absorb bursts while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Event emitted when the donation page reports a declined payment.
#[derive(Debug, Clone)]
pub struct FailureReported {
    pub report: PaymentFailureReport,
}

/// Sender handle for FailureReported events.
pub type FailureReportedSender = mpsc::Sender<FailureReported>;
/// Receiver handle for FailureReported events.
pub type FailureReportedReceiver = mpsc::Receiver<FailureReported>;

/// Create a new FailureReported channel.
///
/// Returns a (sender, receiver) pair. Multiple senders can be cloned from
/// the returned sender.
pub fn failure_reported_channel() -> (FailureReportedSender, FailureReportedReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Container for all event channel senders.
///
/// Passed to components that need to emit events.
#[derive(Clone)]
pub struct EventSenders {
    /// Sender for FailureReported events.
    pub failure_reported: FailureReportedSender,
}

impl EventSenders {
    /// Create a new EventSenders container.
    pub fn new(failure_reported: FailureReportedSender) -> Self {
        Self { failure_reported }
    }
}
