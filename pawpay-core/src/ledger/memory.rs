//! In-memory ledger backend.
//!
//! Backs `--in-memory` runs and unit tests. State lives in process memory
//! and is lost on shutdown.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use compact_str::CompactString;
use itertools::Itertools;
use kanau::processor::Processor;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::LedgerError;
use crate::entities::donation_records::{
    DonationRecord, DonationStats, GetDonationByPaymentId, GetDonationStats, InsertDonationRecord,
    ListDonationRecords,
};
use crate::entities::failure_records::{FailureRecord, InsertFailureRecord, ListFailureRecords};
use crate::entities::order_records::{GetOrderRecordById, InsertOrderRecord, OrderRecord};
use crate::entities::{DonationKind, PaymentState};

pub struct MemoryLedger {
    orders: RwLock<HashMap<CompactString, OrderRecord>>,
    donations: RwLock<Vec<DonationRecord>>,
    failures: RwLock<Vec<FailureRecord>>,
    next_failure_id: AtomicI64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            donations: RwLock::new(Vec::new()),
            failures: RwLock::new(Vec::new()),
            next_failure_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor<InsertOrderRecord> for MemoryLedger {
    type Output = OrderRecord;
    type Error = LedgerError;
    async fn process(&self, msg: InsertOrderRecord) -> Result<OrderRecord, LedgerError> {
        let record = OrderRecord {
            order_id: msg.order_id.clone(),
            amount: msg.amount,
            currency: msg.currency,
            receipt: msg.receipt,
            notes: sqlx::types::Json(msg.notes),
            created_at: msg.created_at,
        };
        self.orders
            .write()
            .await
            .insert(msg.order_id, record.clone());
        Ok(record)
    }
}

impl Processor<GetOrderRecordById> for MemoryLedger {
    type Output = Option<OrderRecord>;
    type Error = LedgerError;
    async fn process(&self, msg: GetOrderRecordById) -> Result<Option<OrderRecord>, LedgerError> {
        Ok(self.orders.read().await.get(&msg.order_id).cloned())
    }
}

impl Processor<InsertDonationRecord> for MemoryLedger {
    type Output = DonationRecord;
    type Error = LedgerError;
    async fn process(&self, msg: InsertDonationRecord) -> Result<DonationRecord, LedgerError> {
        let mut donations = self.donations.write().await;
        // Same idempotence rule as the unique payment_id column.
        if let Some(existing) = donations.iter().find(|d| d.payment_id == msg.payment_id) {
            return Ok(existing.clone());
        }
        let record = DonationRecord {
            id: Uuid::now_v7(),
            order_id: msg.order_id,
            payment_id: msg.payment_id,
            donor_name: msg.donor_name,
            donor_email: msg.donor_email,
            donor_phone: msg.donor_phone,
            donor_address: msg.donor_address,
            amount: msg.amount,
            currency: msg.currency,
            donation_type: msg.donation_type,
            payment_status: msg.payment_status,
            created_at: msg.created_at,
        };
        donations.push(record.clone());
        Ok(record)
    }
}

impl Processor<GetDonationByPaymentId> for MemoryLedger {
    type Output = Option<DonationRecord>;
    type Error = LedgerError;
    async fn process(
        &self,
        msg: GetDonationByPaymentId,
    ) -> Result<Option<DonationRecord>, LedgerError> {
        Ok(self
            .donations
            .read()
            .await
            .iter()
            .find(|d| d.payment_id == msg.payment_id)
            .cloned())
    }
}

impl Processor<ListDonationRecords> for MemoryLedger {
    type Output = Vec<DonationRecord>;
    type Error = LedgerError;
    async fn process(&self, msg: ListDonationRecords) -> Result<Vec<DonationRecord>, LedgerError> {
        let donations = self.donations.read().await;
        let records = donations
            .iter()
            .filter(|d| msg.status.is_none_or(|s| d.payment_status == s))
            .filter(|d| msg.donation_type.is_none_or(|t| d.donation_type == t))
            .sorted_by(|a, b| b.created_at.cmp(&a.created_at))
            .skip(msg.offset.max(0) as usize)
            .take(msg.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(records)
    }
}

impl Processor<GetDonationStats> for MemoryLedger {
    type Output = DonationStats;
    type Error = LedgerError;
    async fn process(&self, _msg: GetDonationStats) -> Result<DonationStats, LedgerError> {
        let donations = self.donations.read().await;
        let failures = self.failures.read().await;
        Ok(DonationStats {
            total_donations: donations.len() as i64,
            total_amount_minor: donations
                .iter()
                .filter(|d| d.payment_status == PaymentState::Success)
                .map(|d| d.amount)
                .sum(),
            one_time_count: donations
                .iter()
                .filter(|d| d.donation_type == DonationKind::OneTime)
                .count() as i64,
            monthly_count: donations
                .iter()
                .filter(|d| d.donation_type == DonationKind::Monthly)
                .count() as i64,
            failed_payments: failures.len() as i64,
        })
    }
}

impl Processor<InsertFailureRecord> for MemoryLedger {
    type Output = FailureRecord;
    type Error = LedgerError;
    async fn process(&self, msg: InsertFailureRecord) -> Result<FailureRecord, LedgerError> {
        let record = FailureRecord {
            id: self.next_failure_id.fetch_add(1, Ordering::Relaxed),
            order_id: msg.order_id,
            error_code: msg.error_code,
            error_description: msg.error_description,
            error_source: msg.error_source,
            error_step: msg.error_step,
            error_reason: msg.error_reason,
            reported_at: msg.reported_at,
        };
        self.failures.write().await.push(record.clone());
        Ok(record)
    }
}

impl Processor<ListFailureRecords> for MemoryLedger {
    type Output = Vec<FailureRecord>;
    type Error = LedgerError;
    async fn process(&self, msg: ListFailureRecords) -> Result<Vec<FailureRecord>, LedgerError> {
        let failures = self.failures.read().await;
        let records = failures
            .iter()
            .filter(|f| {
                msg.order_id
                    .as_ref()
                    .is_none_or(|wanted| &f.order_id == wanted)
            })
            .sorted_by(|a, b| b.reported_at.cmp(&a.reported_at).then(b.id.cmp(&a.id)))
            .skip(msg.offset.max(0) as usize)
            .take(msg.limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::entities::CurrencyCode;

    fn at(secs: i64) -> time::PrimitiveDateTime {
        let odt = time::OffsetDateTime::from_unix_timestamp(secs).unwrap();
        time::PrimitiveDateTime::new(odt.date(), odt.time())
    }

    fn donation(payment_id: &str, amount: i64, kind: DonationKind, secs: i64) -> InsertDonationRecord {
        InsertDonationRecord {
            order_id: "order_test".into(),
            payment_id: payment_id.into(),
            donor_name: "Asha Rao".into(),
            donor_email: "asha@example.com".into(),
            donor_phone: "+911234567890".into(),
            donor_address: None,
            amount,
            currency: CurrencyCode::Inr,
            donation_type: kind,
            payment_status: PaymentState::Success,
            created_at: at(secs),
        }
    }

    #[tokio::test]
    async fn duplicate_payment_id_returns_existing_donation() {
        let ledger = MemoryLedger::new();
        let first = ledger
            .process(donation("pay_1", 5000, DonationKind::OneTime, 100))
            .await
            .unwrap();
        let mut replay = donation("pay_1", 9999, DonationKind::Monthly, 200);
        replay.donor_name = "Someone Else".into();
        let second = ledger.process(replay).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.amount, 5000);
        assert_eq!(second.donor_name, "Asha Rao");

        let stats = ledger.process(GetDonationStats).await.unwrap();
        assert_eq!(stats.total_donations, 1);
    }

    #[tokio::test]
    async fn donation_listing_is_newest_first_with_filters() {
        let ledger = MemoryLedger::new();
        ledger
            .process(donation("pay_a", 100, DonationKind::OneTime, 10))
            .await
            .unwrap();
        ledger
            .process(donation("pay_b", 200, DonationKind::Monthly, 30))
            .await
            .unwrap();
        ledger
            .process(donation("pay_c", 300, DonationKind::OneTime, 20))
            .await
            .unwrap();

        let all = ledger
            .process(ListDonationRecords {
                limit: 10,
                offset: 0,
                status: None,
                donation_type: None,
            })
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|d| d.payment_id.as_str()).collect();
        assert_eq!(ids, ["pay_b", "pay_c", "pay_a"]);

        let one_time = ledger
            .process(ListDonationRecords {
                limit: 10,
                offset: 0,
                status: None,
                donation_type: Some(DonationKind::OneTime),
            })
            .await
            .unwrap();
        assert_eq!(one_time.len(), 2);

        let paged = ledger
            .process(ListDonationRecords {
                limit: 1,
                offset: 1,
                status: None,
                donation_type: None,
            })
            .await
            .unwrap();
        assert_eq!(paged[0].payment_id, "pay_c");
    }

    #[tokio::test]
    async fn failure_ids_increment_from_one() {
        let ledger = MemoryLedger::new();
        let msg = InsertFailureRecord {
            order_id: "order_test".into(),
            error_code: "BAD_REQUEST_ERROR".into(),
            error_description: "Payment failed".into(),
            error_source: "gateway".into(),
            error_step: "payment_authorization".into(),
            error_reason: "payment_failed".into(),
            reported_at: at(50),
        };
        let first = ledger.process(msg.clone()).await.unwrap();
        let second = ledger.process(msg).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let stats = ledger.process(GetDonationStats).await.unwrap();
        assert_eq!(stats.failed_payments, 2);
    }
}
