pub trait HasUpdatedAtColumn: sea_orm::EntityTrait {
    fn updated_at_column() -> Self::Column;
}

/// Bookkeeping columns, both epoch milliseconds.
pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts_ms: i64);
    fn set_updated_at(&mut self, ts_ms: i64);
}
