/// Discount identifiers are UUID v7 so insertion order and id order agree.
pub type DiscountId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
