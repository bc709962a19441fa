/// Job identifiers are opaque strings assigned by the scheduler.
pub type JobId = String;

/// All parsed timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
