use sqlx::PgPool;

/// Postgres-backed message processor. Every ledger `Processor` impl in
/// `entities` runs its query against this pool.
pub struct DatabaseProcessor {
    pub pool: PgPool,
}
