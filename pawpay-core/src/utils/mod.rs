pub mod ids;

/// Current wall-clock time as a UTC `PrimitiveDateTime`, the representation
/// stored in ledger rows.
pub fn now_time() -> time::PrimitiveDateTime {
    let now = time::OffsetDateTime::now_utc();
    time::PrimitiveDateTime::new(now.date(), now.time())
}
