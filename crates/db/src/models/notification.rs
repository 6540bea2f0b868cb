//! Notification queue and preference entity models.

use dealdrop_core::dedupe::DedupeIdentity;
use dealdrop_core::policy::DeliveryPolicy;
use dealdrop_core::quiet_hours::QuietHours;
use dealdrop_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Pending state: the only re-enterable status. Rescheduling keeps an item
/// queued and only advances `scheduled_for`.
pub const STATUS_QUEUED: &str = "queued";

/// Terminal state: a gateway submission containing the item succeeded.
pub const STATUS_SENT: &str = "sent";

/// Terminal state: the item was dropped without delivery (opt-out,
/// duplicate, no destination, or attempt cap).
pub const STATUS_SKIPPED: &str = "skipped";

// ---------------------------------------------------------------------------
// QueuedNotification
// ---------------------------------------------------------------------------

/// A row from the `notification_queue` table: one durable unit of pending
/// notification work, created by upstream producers and mutated only by
/// the drain cycle.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueuedNotification {
    pub id: DbId,
    pub user_id: DbId,
    pub category: String,
    pub title: String,
    pub body: String,
    /// Deep-link route opened when the push is tapped, e.g. `/deal?id=5`.
    pub route: String,
    /// Arbitrary producer metadata, passed through to the gateway opaquely.
    pub data: serde_json::Value,
    pub dedupe_key: Option<String>,
    /// Number of gateway submission attempts that included this item.
    pub attempts: i32,
    /// The item is eligible for processing only once now >= this value.
    pub scheduled_for: Timestamp,
    pub status: String,
    /// Why a skipped item was dropped; NULL while queued or sent.
    pub skip_reason: Option<String>,
    pub created_at: Timestamp,
}

impl QueuedNotification {
    /// Identity used to collapse duplicate deliveries within one drain
    /// cycle: the explicit dedupe key when present, else category + route.
    pub fn dedupe_identity(&self) -> DedupeIdentity {
        DedupeIdentity::new(
            self.user_id,
            self.dedupe_key.as_deref(),
            &self.category,
            &self.route,
        )
    }
}

// ---------------------------------------------------------------------------
// DeliveryPreference
// ---------------------------------------------------------------------------

/// A row from the `notification_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeliveryPreference {
    pub user_id: DbId,
    /// Master switch; `false` skips every queued item for the user.
    pub smart_enabled: bool,
    pub quiet_hours_start: i32,
    pub quiet_hours_end: i32,
    pub updated_at: Timestamp,
}

impl DeliveryPreference {
    /// Resolve the stored row into an effective delivery policy. Hour
    /// values outside `[0, 24)` are clamped rather than rejected.
    pub fn policy(&self) -> DeliveryPolicy {
        DeliveryPolicy {
            smart_enabled: self.smart_enabled,
            quiet_hours: QuietHours::new(self.quiet_hours_start, self.quiet_hours_end),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
