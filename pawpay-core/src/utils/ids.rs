//! Public identifier generation.
//!
//! Orders and payments carry prefixed, URL-safe identifiers
//! (`order_…`, `pay_…`): a random UUID encoded as lowercase Crockford
//! base32.

use compact_str::{CompactString, format_compact};
use uuid::Uuid;

/// Generate an order identifier (`order_` prefix).
pub fn new_order_id() -> CompactString {
    prefixed_id("order")
}

/// Generate a payment identifier (`pay_` prefix).
pub fn new_payment_id() -> CompactString {
    prefixed_id("pay")
}

fn prefixed_id(prefix: &str) -> CompactString {
    let encoded = fast32::base32::CROCKFORD_LOWER.encode(Uuid::new_v4().as_bytes());
    format_compact!("{prefix}_{encoded}")
}
