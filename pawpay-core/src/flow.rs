//! Settlement and failure logging.
//!
//! `settle_verified_payment` is the only path that creates donations, and
//! it is idempotent on the gateway payment id: the donation page can retry
//! a verification call after a timeout without ever double-recording.

use kanau::processor::Processor;
use pawpay_sdk::objects::payments::{DonorDetails, PaymentFailureReport};

use crate::entities::PaymentState;
use crate::entities::donation_records::{
    DonationRecord, GetDonationByPaymentId, InsertDonationRecord,
};
use crate::entities::failure_records::{FailureRecord, InsertFailureRecord};
use crate::entities::order_records::GetOrderRecordById;
use crate::ledger::{DonationLedger, LedgerError};
use crate::utils::now_time;
use crate::verify::{self, PaymentClaim, VerifyError};

/// Why a settlement attempt failed.
///
/// A verification failure is final; a persistence failure is retryable.
/// The API layer maps the two to different status codes and messages.
#[derive(Debug, thiserror::Error)]
pub enum SettleError {
    #[error("payment verification failed: {0}")]
    Verification(#[from] VerifyError),
    #[error("donation could not be recorded: {0}")]
    Persistence(#[from] LedgerError),
}

/// Verify a gateway handoff and record the donation.
///
/// The recorded amount is copied from the originating order, never from
/// the request. Re-settling an already recorded payment returns the
/// original donation row unchanged.
pub async fn settle_verified_payment<L: DonationLedger>(
    ledger: &L,
    claim: PaymentClaim,
    donor: DonorDetails,
    secret: &[u8],
) -> Result<DonationRecord, SettleError> {
    let order = ledger
        .process(GetOrderRecordById {
            order_id: claim.order_id.clone(),
        })
        .await?
        .ok_or(VerifyError::UnknownOrder)?;

    verify::verify_payment(&order, &claim, secret)?;

    if let Some(existing) = ledger
        .process(GetDonationByPaymentId {
            payment_id: claim.payment_id.clone(),
        })
        .await?
    {
        tracing::info!(
            payment_id = %claim.payment_id,
            donation_id = %existing.id,
            "verification replayed, donation already recorded"
        );
        return Ok(existing);
    }

    let donation = ledger
        .process(InsertDonationRecord {
            order_id: order.order_id.clone(),
            payment_id: claim.payment_id,
            donor_name: donor.name,
            donor_email: donor.email,
            donor_phone: donor.phone,
            donor_address: donor.address,
            amount: order.amount,
            currency: order.currency,
            donation_type: donor.donation_type.into(),
            payment_status: PaymentState::Success,
            created_at: now_time(),
        })
        .await?;

    tracing::info!(
        donation_id = %donation.id,
        order_id = %donation.order_id,
        amount = donation.amount,
        "donation recorded"
    );
    Ok(donation)
}

/// Persist a reported gateway failure. No donation is written on this
/// path.
pub async fn log_gateway_failure<L: DonationLedger>(
    ledger: &L,
    report: PaymentFailureReport,
) -> Result<FailureRecord, LedgerError> {
    let record = ledger
        .process(InsertFailureRecord {
            order_id: report.order_id,
            error_code: report.error_code,
            error_description: report.error_description,
            error_source: report.error_source,
            error_step: report.error_step,
            error_reason: report.error_reason,
            reported_at: now_time(),
        })
        .await?;
    tracing::warn!(
        failure_id = record.id,
        order_id = %record.order_id,
        code = %record.error_code,
        "gateway failure logged"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use std::collections::BTreeMap;
    use std::sync::Arc;

    use pawpay_sdk::objects::DonationType;
    use pawpay_sdk::signature;
    use tokio::sync::RwLock;

    use super::*;
    use crate::config::GatewayConfig;
    use crate::entities::order_records::{InsertOrderRecord, OrderRecord};
    use crate::entities::{CurrencyCode, DonationKind};
    use crate::gateway::{GatewayFailure, GatewayResult, PaymentGateway, SimulatedGateway};
    use crate::ledger::MemoryLedger;
    use crate::orders::{CreateOrder, build_order};

    const SECRET: &[u8] = b"test-gateway-secret";

    async fn seeded_order(ledger: &MemoryLedger, amount: i64) -> OrderRecord {
        let insert = build_order(CreateOrder {
            amount,
            currency: CurrencyCode::Inr,
            receipt: "receipt#1".to_string(),
            notes: BTreeMap::new(),
        })
        .unwrap();
        ledger.process(insert).await.unwrap()
    }

    async fn authorized_claim(order_id: &str) -> PaymentClaim {
        let config = Arc::new(RwLock::new(GatewayConfig::new(SECRET, 1.0, 0, 900)));
        let gateway = SimulatedGateway::with_seed(config, 11);
        match gateway.authorize(order_id).await {
            GatewayResult::Succeeded {
                order_id,
                payment_id,
                signature,
            } => PaymentClaim {
                order_id,
                payment_id,
                signature,
            },
            GatewayResult::Failed { .. } => panic!("rate 1.0 must authorize"),
        }
    }

    fn donor() -> DonorDetails {
        DonorDetails {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "+911234567890".to_string(),
            address: Some("12 Paw Lane".to_string()),
            donation_type: DonationType::Monthly,
        }
    }

    #[tokio::test]
    async fn valid_claim_records_donation_with_order_amount() {
        let ledger = MemoryLedger::new();
        let order = seeded_order(&ledger, 50_000).await;
        let claim = authorized_claim(&order.order_id).await;

        let donation = settle_verified_payment(&ledger, claim, donor(), SECRET)
            .await
            .unwrap();

        assert_eq!(donation.order_id, order.order_id);
        assert_eq!(donation.amount, 50_000);
        assert_eq!(donation.payment_status, PaymentState::Success);
        assert_eq!(donation.donation_type, DonationKind::Monthly);
        assert_eq!(donation.donor_email, "asha@example.com");
    }

    #[tokio::test]
    async fn full_flow_from_order_to_recorded_donation() {
        let ledger = MemoryLedger::new();
        let insert = build_order(CreateOrder {
            amount: 10_000,
            currency: CurrencyCode::Inr,
            receipt: "donation_1700000000000".to_string(),
            notes: BTreeMap::new(),
        })
        .unwrap();
        let order = ledger.process(insert).await.unwrap();
        assert_eq!(order.receipt, "donation_1700000000000");

        let claim = authorized_claim(&order.order_id).await;
        let mut asha = donor();
        asha.donation_type = DonationType::OneTime;
        let donation = settle_verified_payment(&ledger, claim, asha, SECRET)
            .await
            .unwrap();

        assert_eq!(donation.amount, 10_000);
        assert_eq!(donation.currency, CurrencyCode::Inr);
        assert_eq!(donation.payment_status, PaymentState::Success);
        assert_eq!(donation.donation_type, DonationKind::OneTime);
        assert_eq!(donation.donor_name, "Asha Rao");
    }

    #[tokio::test]
    async fn tampered_signature_records_nothing() {
        let ledger = MemoryLedger::new();
        let order = seeded_order(&ledger, 50_000).await;
        let mut claim = authorized_claim(&order.order_id).await;
        claim.signature = signature::sign_payment(&order.order_id, "pay_forged", SECRET);

        let payment_id = claim.payment_id.clone();
        let err = settle_verified_payment(&ledger, claim, donor(), SECRET)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SettleError::Verification(VerifyError::SignatureMismatch)
        ));

        let recorded = ledger
            .process(GetDonationByPaymentId { payment_id })
            .await
            .unwrap();
        assert!(recorded.is_none());
    }

    #[tokio::test]
    async fn unknown_order_fails_verification() {
        let ledger = MemoryLedger::new();
        let claim = authorized_claim("order_ghost").await;
        let err = settle_verified_payment(&ledger, claim, donor(), SECRET)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SettleError::Verification(VerifyError::UnknownOrder)
        ));
    }

    #[tokio::test]
    async fn replayed_settlement_returns_the_original_donation() {
        let ledger = MemoryLedger::new();
        let order = seeded_order(&ledger, 7_500).await;
        let claim = authorized_claim(&order.order_id).await;

        let first = settle_verified_payment(&ledger, claim.clone(), donor(), SECRET)
            .await
            .unwrap();
        let mut other_donor = donor();
        other_donor.name = "Someone Else".to_string();
        let second = settle_verified_payment(&ledger, claim, other_donor, SECRET)
            .await
            .unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.donor_name, "Asha Rao");
    }

    #[tokio::test]
    async fn persistence_failure_is_not_a_verification_failure() {
        struct FlakyLedger {
            order: OrderRecord,
        }

        impl Processor<InsertOrderRecord> for FlakyLedger {
            type Output = OrderRecord;
            type Error = LedgerError;
            async fn process(&self, _msg: InsertOrderRecord) -> Result<OrderRecord, LedgerError> {
                Err(LedgerError::Database(sqlx::Error::PoolClosed))
            }
        }
        impl Processor<GetOrderRecordById> for FlakyLedger {
            type Output = Option<OrderRecord>;
            type Error = LedgerError;
            async fn process(
                &self,
                _msg: GetOrderRecordById,
            ) -> Result<Option<OrderRecord>, LedgerError> {
                Ok(Some(self.order.clone()))
            }
        }
        impl Processor<GetDonationByPaymentId> for FlakyLedger {
            type Output = Option<DonationRecord>;
            type Error = LedgerError;
            async fn process(
                &self,
                _msg: GetDonationByPaymentId,
            ) -> Result<Option<DonationRecord>, LedgerError> {
                Ok(None)
            }
        }
        impl Processor<InsertDonationRecord> for FlakyLedger {
            type Output = DonationRecord;
            type Error = LedgerError;
            async fn process(
                &self,
                _msg: InsertDonationRecord,
            ) -> Result<DonationRecord, LedgerError> {
                Err(LedgerError::Database(sqlx::Error::PoolClosed))
            }
        }
        impl Processor<InsertFailureRecord> for FlakyLedger {
            type Output = FailureRecord;
            type Error = LedgerError;
            async fn process(&self, _msg: InsertFailureRecord) -> Result<FailureRecord, LedgerError> {
                Err(LedgerError::Database(sqlx::Error::PoolClosed))
            }
        }

        let healthy = MemoryLedger::new();
        let order = seeded_order(&healthy, 1_000).await;
        let claim = authorized_claim(&order.order_id).await;

        let flaky = FlakyLedger { order };
        let err = settle_verified_payment(&flaky, claim, donor(), SECRET)
            .await
            .unwrap_err();
        assert!(matches!(err, SettleError::Persistence(_)));
    }

    #[tokio::test]
    async fn declined_payment_logs_a_failure_and_no_donation() {
        let ledger = MemoryLedger::new();
        let order = seeded_order(&ledger, 2_000).await;
        let report = GatewayFailure::declined().to_report(order.order_id.clone());

        let record = log_gateway_failure(&ledger, report).await.unwrap();
        assert_eq!(record.order_id, order.order_id);
        assert_eq!(record.error_code, "BAD_REQUEST_ERROR");
        assert_eq!(record.error_step, "payment_authorization");

        let stats = ledger
            .process(crate::entities::donation_records::GetDonationStats)
            .await
            .unwrap();
        assert_eq!(stats.total_donations, 0);
        assert_eq!(stats.failed_payments, 1);
    }
}
