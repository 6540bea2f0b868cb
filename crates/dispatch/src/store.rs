//! Storage seam for the dispatch pipeline.
//!
//! Both the queue drain and the mention fan-out run against
//! [`NotificationStore`] rather than a concrete database so the pipeline
//! can be exercised end-to-end with an in-memory store in tests. The
//! production implementation is [`PgNotificationStore`](crate::pg).

use std::collections::HashMap;

use async_trait::async_trait;
use dealdrop_core::types::{DbId, Timestamp};
use dealdrop_db::models::notification::{DeliveryPreference, QueuedNotification};

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying database call failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store backend is unavailable or misbehaving.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Data access required by the dispatch pipeline.
///
/// Status updates must be conditional on the row still being queued
/// (idempotent re-marking, never blind overwrites) so that overlapping
/// drain cycles cannot resurrect a terminal row.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Queued items with `scheduled_for <= now`, oldest first, capped at
    /// `limit`.
    async fn fetch_ready(
        &self,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<QueuedNotification>, StoreError>;

    /// Preference rows for a batch of recipients; recipients without a row
    /// are absent from the map.
    async fn fetch_preferences(
        &self,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, DeliveryPreference>, StoreError>;

    /// Non-disabled device tokens per recipient; recipients with no
    /// devices are absent from the map.
    async fn fetch_active_tokens(
        &self,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<String>>, StoreError>;

    /// Transition items to `sent`. Re-marking a terminal item is a no-op.
    async fn mark_sent(&self, ids: &[DbId]) -> Result<(), StoreError>;

    /// Transition items to `skipped` with a reason. Re-marking a terminal
    /// item is a no-op.
    async fn mark_skipped(&self, ids: &[DbId], reason: &str) -> Result<(), StoreError>;

    /// Advance an item's `scheduled_for`. Returns `false` when the move
    /// was refused (terminal item, or the new time is not a forward move).
    async fn reschedule(&self, id: DbId, scheduled_for: Timestamp) -> Result<bool, StoreError>;

    /// Record one more submission attempt for each item.
    async fn increment_attempts(&self, ids: &[DbId]) -> Result<(), StoreError>;

    /// Resolve usernames to user ids; unknown names are absent from the
    /// map.
    async fn resolve_usernames(
        &self,
        usernames: &[String],
    ) -> Result<HashMap<String, DbId>, StoreError>;
}
