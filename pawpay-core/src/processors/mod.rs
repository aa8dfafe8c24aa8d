//! Background processors.
//!
//! This module contains the long-running tasks the server spawns beside
//! the HTTP listener:
//!
//! - `FailureLogger`: Receives `FailureReported`, writes failure records
//! - `SessionSweeper`: Evicts checkout sessions idle past the TTL

pub mod failure_logger;
pub mod session_sweeper;

pub use failure_logger::FailureLogger;
pub use session_sweeper::SessionSweeper;
