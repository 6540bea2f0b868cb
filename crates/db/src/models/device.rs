//! Push device entity model.

use dealdrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `push_devices` table: one registered device target for a
/// recipient. Only non-disabled devices are eligible for delivery.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PushDevice {
    pub id: DbId,
    pub user_id: DbId,
    /// Opaque token addressing the device at the push gateway.
    pub token: String,
    pub disabled: bool,
    pub created_at: Timestamp,
}
