use compact_str::CompactString;
use kanau::processor::Processor;
use uuid::Uuid;

use crate::entities::{CurrencyCode, DonationKind, PaymentState};
use crate::framework::DatabaseProcessor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct DonationRecord {
    pub id: Uuid,
    pub order_id: CompactString,
    pub payment_id: CompactString,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_address: Option<String>,
    pub amount: i64,
    pub currency: CurrencyCode,
    pub donation_type: DonationKind,
    pub payment_status: PaymentState,
    pub created_at: time::PrimitiveDateTime,
}

/// Insert a verified donation.
///
/// The `payment_id` column is unique; inserting the same payment twice
/// returns the already-recorded donation instead of a second row.
#[derive(Debug, Clone)]
pub struct InsertDonationRecord {
    pub order_id: CompactString,
    pub payment_id: CompactString,
    pub donor_name: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub donor_address: Option<String>,
    pub amount: i64,
    pub currency: CurrencyCode,
    pub donation_type: DonationKind,
    pub payment_status: PaymentState,
    pub created_at: time::PrimitiveDateTime,
}

impl Processor<InsertDonationRecord> for DatabaseProcessor {
    type Output = DonationRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertDonationRecord")]
    async fn process(&self, msg: InsertDonationRecord) -> Result<DonationRecord, sqlx::Error> {
        let inserted = sqlx::query_as::<_, DonationRecord>(
            r#"
            INSERT INTO donation_records
                (id, order_id, payment_id, donor_name, donor_email, donor_phone,
                 donor_address, amount, currency, donation_type, payment_status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (payment_id) DO NOTHING
            RETURNING id, order_id, payment_id, donor_name, donor_email, donor_phone,
                      donor_address, amount, currency, donation_type, payment_status, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&msg.order_id)
        .bind(&msg.payment_id)
        .bind(&msg.donor_name)
        .bind(&msg.donor_email)
        .bind(&msg.donor_phone)
        .bind(&msg.donor_address)
        .bind(msg.amount)
        .bind(msg.currency)
        .bind(msg.donation_type)
        .bind(msg.payment_status)
        .bind(msg.created_at)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(record) => Ok(record),
            // Conflict: this payment was already recorded.
            None => {
                sqlx::query_as::<_, DonationRecord>(
                    r#"
                    SELECT id, order_id, payment_id, donor_name, donor_email, donor_phone,
                           donor_address, amount, currency, donation_type, payment_status, created_at
                    FROM donation_records
                    WHERE payment_id = $1
                    "#,
                )
                .bind(&msg.payment_id)
                .fetch_one(&self.pool)
                .await
            }
        }
    }
}

/// Look up a donation by the gateway payment identifier.
#[derive(Debug, Clone)]
pub struct GetDonationByPaymentId {
    pub payment_id: CompactString,
}

impl Processor<GetDonationByPaymentId> for DatabaseProcessor {
    type Output = Option<DonationRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetDonationByPaymentId")]
    async fn process(
        &self,
        msg: GetDonationByPaymentId,
    ) -> Result<Option<DonationRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, DonationRecord>(
            r#"
            SELECT id, order_id, payment_id, donor_name, donor_email, donor_phone,
                   donor_address, amount, currency, donation_type, payment_status, created_at
            FROM donation_records
            WHERE payment_id = $1
            "#,
        )
        .bind(&msg.payment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}

/// List donations with pagination and optional filters, newest first.
#[derive(Debug, Clone)]
pub struct ListDonationRecords {
    pub limit: i64,
    pub offset: i64,
    pub status: Option<PaymentState>,
    pub donation_type: Option<DonationKind>,
}

impl Processor<ListDonationRecords> for DatabaseProcessor {
    type Output = Vec<DonationRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListDonationRecords")]
    async fn process(&self, msg: ListDonationRecords) -> Result<Vec<DonationRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, DonationRecord>(
            r#"
            SELECT id, order_id, payment_id, donor_name, donor_email, donor_phone,
                   donor_address, amount, currency, donation_type, payment_status, created_at
            FROM donation_records
            WHERE ($3::payment_state IS NULL OR payment_status = $3)
              AND ($4::donation_kind IS NULL OR donation_type = $4)
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(msg.limit)
        .bind(msg.offset)
        .bind(msg.status)
        .bind(msg.donation_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}

/// Aggregate donation totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::FromRow)]
pub struct DonationStats {
    pub total_donations: i64,
    pub total_amount_minor: i64,
    pub one_time_count: i64,
    pub monthly_count: i64,
    pub failed_payments: i64,
}

/// Compute aggregate donation totals plus the failure count.
#[derive(Debug, Clone, Copy)]
pub struct GetDonationStats;

impl Processor<GetDonationStats> for DatabaseProcessor {
    type Output = DonationStats;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetDonationStats")]
    async fn process(&self, _msg: GetDonationStats) -> Result<DonationStats, sqlx::Error> {
        let stats = sqlx::query_as::<_, DonationStats>(
            r#"
            SELECT
                COUNT(*) AS total_donations,
                COALESCE(SUM(amount) FILTER (WHERE payment_status = 'success'), 0)::BIGINT
                    AS total_amount_minor,
                COUNT(*) FILTER (WHERE donation_type = 'one_time') AS one_time_count,
                COUNT(*) FILTER (WHERE donation_type = 'monthly') AS monthly_count,
                (SELECT COUNT(*) FROM failure_records) AS failed_payments
            FROM donation_records
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}
