//! Admin API request and response types.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Currency, DonationType, PaymentStatus};

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// One recorded donation for the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDonationResponse {
    pub id: Uuid,
    pub order_id: CompactString,
    pub payment_id: CompactString,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_address: Option<String>,
    pub amount: i64,
    pub currency: Currency,
    pub donation_type: DonationType,
    pub payment_status: PaymentStatus,
    pub created_at: i64,
}

/// One logged gateway failure for the admin listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminFailureResponse {
    pub id: i64,
    pub order_id: CompactString,
    pub error_code: CompactString,
    pub error_description: String,
    pub error_source: CompactString,
    pub error_step: CompactString,
    pub error_reason: CompactString,
    pub reported_at: i64,
}

/// Aggregate donation figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationStatsResponse {
    pub total_donations: i64,
    pub total_amount_minor: i64,
    pub one_time_count: i64,
    pub monthly_count: i64,
    pub failed_payments: i64,
}

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 200;
const MAX_OFFSET: i64 = 100_000;

/// Query parameters for listing donations.
#[derive(Debug, Clone, Deserialize)]
pub struct ListDonationsQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub status: Option<PaymentStatus>,
    pub donation_type: Option<DonationType>,
}

/// Query parameters for listing failures.
#[derive(Debug, Clone, Deserialize)]
pub struct ListFailuresQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
    pub order_id: Option<CompactString>,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Clamp limit and offset to safe maximums.
pub fn clamp_pagination(limit: i64, offset: i64) -> (i64, i64) {
    (limit.clamp(1, MAX_LIMIT), offset.clamp(0, MAX_OFFSET))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn clamp_pagination_bounds_inputs() {
        assert_eq!(clamp_pagination(20, 0), (20, 0));
        assert_eq!(clamp_pagination(0, -5), (1, 0));
        assert_eq!(clamp_pagination(1_000, 1_000_000), (200, 100_000));
    }

    #[test]
    fn list_query_defaults_apply() {
        let q: ListDonationsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 20);
        assert_eq!(q.offset, 0);
        assert!(q.status.is_none());
    }
}
