//! Repository for the `push_devices` table.

use dealdrop_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::PushDevice;

/// Column list for `push_devices` queries.
const COLUMNS: &str = "id, user_id, token, disabled, created_at";

/// Provides batch device-token lookups for the drain cycle and mention
/// fan-out.
pub struct PushDeviceRepo;

impl PushDeviceRepo {
    /// Load all non-disabled devices for a batch of recipients in one
    /// query. Recipients with no devices do not appear in the result.
    pub async fn list_active_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<PushDevice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM push_devices \
             WHERE user_id = ANY($1) AND disabled = false \
             ORDER BY id"
        );
        sqlx::query_as::<_, PushDevice>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }
}
