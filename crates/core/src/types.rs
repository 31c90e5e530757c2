/// Primary keys are UUIDs issued by the hosted backend (`gen_random_uuid()`
/// for tables, the auth service for users).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Monetary amounts. Currency travels in a separate field.
pub type Amount = rust_decimal::Decimal;

/// Calendar date without time zone (contract start, publication, ...).
pub type Date = chrono::NaiveDate;
