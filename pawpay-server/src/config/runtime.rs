//! Runtime configuration re-exports and utilities.
//!
//! The actual config types are defined in `pawpay-core::config`.
//! This module re-exports them for convenience.

pub use pawpay_core::config::{AdminConfig, GatewayConfig, ServerConfig, SharedConfig};
