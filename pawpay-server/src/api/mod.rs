//! HTTP API surface, split by audience.
//!
//! - `payments`: platform endpoints called by the donation page backend
//! - `checkout`: donor-facing checkout session endpoints
//! - `admin`: authenticated read endpoints for the fundraising dashboard

pub mod admin;
pub mod checkout;
pub mod extractors;
pub mod payments;
