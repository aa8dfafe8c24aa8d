use compact_str::CompactString;
use kanau::processor::Processor;

use crate::framework::DatabaseProcessor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FailureRecord {
    pub id: i64,
    pub order_id: CompactString,
    pub error_code: CompactString,
    pub error_description: String,
    pub error_source: CompactString,
    pub error_step: CompactString,
    pub error_reason: CompactString,
    pub reported_at: time::PrimitiveDateTime,
}

/// Insert a reported gateway failure.
#[derive(Debug, Clone)]
pub struct InsertFailureRecord {
    pub order_id: CompactString,
    pub error_code: CompactString,
    pub error_description: String,
    pub error_source: CompactString,
    pub error_step: CompactString,
    pub error_reason: CompactString,
    pub reported_at: time::PrimitiveDateTime,
}

impl Processor<InsertFailureRecord> for DatabaseProcessor {
    type Output = FailureRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertFailureRecord")]
    async fn process(&self, msg: InsertFailureRecord) -> Result<FailureRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, FailureRecord>(
            r#"
            INSERT INTO failure_records
                (order_id, error_code, error_description, error_source, error_step,
                 error_reason, reported_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, order_id, error_code, error_description, error_source, error_step,
                      error_reason, reported_at
            "#,
        )
        .bind(&msg.order_id)
        .bind(&msg.error_code)
        .bind(&msg.error_description)
        .bind(&msg.error_source)
        .bind(&msg.error_step)
        .bind(&msg.error_reason)
        .bind(msg.reported_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }
}

/// List failures with pagination and an optional order filter, newest first.
#[derive(Debug, Clone)]
pub struct ListFailureRecords {
    pub limit: i64,
    pub offset: i64,
    pub order_id: Option<CompactString>,
}

impl Processor<ListFailureRecords> for DatabaseProcessor {
    type Output = Vec<FailureRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListFailureRecords")]
    async fn process(&self, msg: ListFailureRecords) -> Result<Vec<FailureRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, FailureRecord>(
            r#"
            SELECT id, order_id, error_code, error_description, error_source, error_step,
                   error_reason, reported_at
            FROM failure_records
            WHERE ($3::text IS NULL OR order_id = $3)
            ORDER BY reported_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(msg.limit)
        .bind(msg.offset)
        .bind(msg.order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }
}
