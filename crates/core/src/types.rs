/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Seconds since the Unix epoch, as carried in session claims.
pub type UnixSeconds = i64;
