//! Repository for the `notification_preferences` table.

use dealdrop_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::DeliveryPreference;

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "user_id, smart_enabled, quiet_hours_start, quiet_hours_end, updated_at";

/// Provides batch preference lookups for the drain cycle.
pub struct NotificationPreferenceRepo;

impl NotificationPreferenceRepo {
    /// Load the preference rows for a batch of recipients in one query.
    ///
    /// Recipients without a row simply do not appear in the result; the
    /// caller applies defaults for them.
    pub async fn list_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<DeliveryPreference>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM notification_preferences WHERE user_id = ANY($1)");
        sqlx::query_as::<_, DeliveryPreference>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }
}
