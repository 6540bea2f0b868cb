//! Repository for the `notification_queue` table.

use dealdrop_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::{QueuedNotification, STATUS_QUEUED, STATUS_SENT, STATUS_SKIPPED};

/// Column list for `notification_queue` queries.
const COLUMNS: &str = "id, user_id, category, title, body, route, data, dedupe_key, \
    attempts, scheduled_for, status, skip_reason, created_at";

/// Provides drain-cycle operations for queued notifications.
///
/// Status transitions are one-way: `queued` rows may become `sent` or
/// `skipped`, and every update here carries a `status = 'queued'` guard so
/// re-marking a terminal row is a no-op rather than an overwrite. That
/// guard is what makes overlapping drain cycles safe without locks.
pub struct NotificationQueueRepo;

impl NotificationQueueRepo {
    /// Fetch queued items that are ready to process, oldest first.
    pub async fn fetch_ready(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<QueuedNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_queue \
             WHERE status = $1 AND scheduled_for <= $2 \
             ORDER BY scheduled_for ASC \
             LIMIT $3"
        );
        sqlx::query_as::<_, QueuedNotification>(&query)
            .bind(STATUS_QUEUED)
            .bind(now)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark items sent. Already-terminal rows are left untouched.
    ///
    /// Returns the number of rows that actually transitioned.
    pub async fn mark_sent(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notification_queue \
             SET status = $1 \
             WHERE id = ANY($2) AND status = $3",
        )
        .bind(STATUS_SENT)
        .bind(ids)
        .bind(STATUS_QUEUED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark items skipped with a short machine-readable reason.
    /// Already-terminal rows are left untouched.
    pub async fn mark_skipped(
        pool: &PgPool,
        ids: &[DbId],
        reason: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notification_queue \
             SET status = $1, skip_reason = $2 \
             WHERE id = ANY($3) AND status = $4",
        )
        .bind(STATUS_SKIPPED)
        .bind(reason)
        .bind(ids)
        .bind(STATUS_QUEUED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Advance an item's `scheduled_for`.
    ///
    /// The `scheduled_for < $2` guard rejects any move backward in time;
    /// returns `false` when the row was terminal, missing, or the new time
    /// would not be an advance.
    pub async fn reschedule(
        pool: &PgPool,
        id: DbId,
        scheduled_for: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notification_queue \
             SET scheduled_for = $2 \
             WHERE id = $1 AND status = $3 AND scheduled_for < $2",
        )
        .bind(id)
        .bind(scheduled_for)
        .bind(STATUS_QUEUED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record one more gateway submission attempt for each item.
    pub async fn increment_attempts(pool: &PgPool, ids: &[DbId]) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_queue \
             SET attempts = attempts + 1 \
             WHERE id = ANY($1) AND status = $2",
        )
        .bind(ids)
        .bind(STATUS_QUEUED)
        .execute(pool)
        .await?;
        Ok(())
    }
}
