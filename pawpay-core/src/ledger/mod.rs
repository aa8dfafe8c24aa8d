//! Persistence seam for orders, donations and failures.
//!
//! Every write the payment flow performs goes through a [`DonationLedger`].
//! [`Ledger`] is the concrete switch between the Postgres backend and the
//! in-memory backend used for demo runs.

pub mod memory;

pub use memory::MemoryLedger;

use kanau::processor::Processor;

use crate::entities::donation_records::{
    DonationRecord, DonationStats, GetDonationByPaymentId, GetDonationStats, InsertDonationRecord,
    ListDonationRecords,
};
use crate::entities::failure_records::{FailureRecord, InsertFailureRecord, ListFailureRecords};
use crate::entities::order_records::{GetOrderRecordById, InsertOrderRecord, OrderRecord};
use crate::framework::DatabaseProcessor;

/// Errors produced by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// The persistence operations the payment flow depends on.
///
/// Blanket-implemented for anything that can process the five flow
/// messages, so the flow functions stay generic and tests can substitute a
/// failing backend.
pub trait DonationLedger:
    Processor<InsertOrderRecord, Output = OrderRecord, Error = LedgerError>
    + Processor<GetOrderRecordById, Output = Option<OrderRecord>, Error = LedgerError>
    + Processor<InsertDonationRecord, Output = DonationRecord, Error = LedgerError>
    + Processor<GetDonationByPaymentId, Output = Option<DonationRecord>, Error = LedgerError>
    + Processor<InsertFailureRecord, Output = FailureRecord, Error = LedgerError>
    + Send
    + Sync
{
}

impl<T> DonationLedger for T where
    T: Processor<InsertOrderRecord, Output = OrderRecord, Error = LedgerError>
        + Processor<GetOrderRecordById, Output = Option<OrderRecord>, Error = LedgerError>
        + Processor<InsertDonationRecord, Output = DonationRecord, Error = LedgerError>
        + Processor<GetDonationByPaymentId, Output = Option<DonationRecord>, Error = LedgerError>
        + Processor<InsertFailureRecord, Output = FailureRecord, Error = LedgerError>
        + Send
        + Sync
{
}

// ---------------------------------------------------------------------------
// Ledger — backend switch
// ---------------------------------------------------------------------------

/// Concrete ledger used by the server: Postgres in production, in-memory
/// behind `--in-memory`.
pub enum Ledger {
    Postgres(DatabaseProcessor),
    Memory(MemoryLedger),
}

impl Processor<InsertOrderRecord> for Ledger {
    type Output = OrderRecord;
    type Error = LedgerError;
    async fn process(&self, msg: InsertOrderRecord) -> Result<OrderRecord, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<GetOrderRecordById> for Ledger {
    type Output = Option<OrderRecord>;
    type Error = LedgerError;
    async fn process(&self, msg: GetOrderRecordById) -> Result<Option<OrderRecord>, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<InsertDonationRecord> for Ledger {
    type Output = DonationRecord;
    type Error = LedgerError;
    async fn process(&self, msg: InsertDonationRecord) -> Result<DonationRecord, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<GetDonationByPaymentId> for Ledger {
    type Output = Option<DonationRecord>;
    type Error = LedgerError;
    async fn process(
        &self,
        msg: GetDonationByPaymentId,
    ) -> Result<Option<DonationRecord>, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<ListDonationRecords> for Ledger {
    type Output = Vec<DonationRecord>;
    type Error = LedgerError;
    async fn process(&self, msg: ListDonationRecords) -> Result<Vec<DonationRecord>, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<GetDonationStats> for Ledger {
    type Output = DonationStats;
    type Error = LedgerError;
    async fn process(&self, msg: GetDonationStats) -> Result<DonationStats, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<InsertFailureRecord> for Ledger {
    type Output = FailureRecord;
    type Error = LedgerError;
    async fn process(&self, msg: InsertFailureRecord) -> Result<FailureRecord, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}

impl Processor<ListFailureRecords> for Ledger {
    type Output = Vec<FailureRecord>;
    type Error = LedgerError;
    async fn process(&self, msg: ListFailureRecords) -> Result<Vec<FailureRecord>, LedgerError> {
        match self {
            Ledger::Postgres(db) => Ok(db.process(msg).await?),
            Ledger::Memory(mem) => mem.process(msg).await,
        }
    }
}
