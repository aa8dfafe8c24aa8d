use std::collections::BTreeMap;

use compact_str::CompactString;
use kanau::processor::Processor;

use crate::entities::CurrencyCode;
use crate::framework::DatabaseProcessor;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderRecord {
    pub order_id: CompactString,
    pub amount: i64,
    pub currency: CurrencyCode,
    pub receipt: String,
    pub notes: sqlx::types::Json<BTreeMap<String, String>>,
    pub created_at: time::PrimitiveDateTime,
}

/// Insert a freshly built order.
#[derive(Debug, Clone)]
pub struct InsertOrderRecord {
    pub order_id: CompactString,
    pub amount: i64,
    pub currency: CurrencyCode,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
    pub created_at: time::PrimitiveDateTime,
}

impl Processor<InsertOrderRecord> for DatabaseProcessor {
    type Output = OrderRecord;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertOrderRecord")]
    async fn process(&self, msg: InsertOrderRecord) -> Result<OrderRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, OrderRecord>(
            r#"
            INSERT INTO order_records (order_id, amount, currency, receipt, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING order_id, amount, currency, receipt, notes, created_at
            "#,
        )
        .bind(&msg.order_id)
        .bind(msg.amount)
        .bind(msg.currency)
        .bind(&msg.receipt)
        .bind(sqlx::types::Json(&msg.notes))
        .bind(msg.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }
}

/// Look up an order by its public identifier.
#[derive(Debug, Clone)]
pub struct GetOrderRecordById {
    pub order_id: CompactString,
}

impl Processor<GetOrderRecordById> for DatabaseProcessor {
    type Output = Option<OrderRecord>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOrderRecordById")]
    async fn process(&self, msg: GetOrderRecordById) -> Result<Option<OrderRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, OrderRecord>(
            r#"
            SELECT order_id, amount, currency, receipt, notes, created_at
            FROM order_records
            WHERE order_id = $1
            "#,
        )
        .bind(&msg.order_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}
