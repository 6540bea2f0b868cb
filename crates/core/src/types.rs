/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC. Quiet-hours evaluation and queue scheduling
/// share this single clock reference.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
