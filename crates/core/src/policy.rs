//! Resolved per-recipient delivery policy.

use crate::quiet_hours::QuietHours;

/// A recipient's effective delivery policy for one drain cycle.
///
/// Built from the recipient's stored preference row, or from
/// [`DeliveryPolicy::default`] when no row exists. Resolution is a pure
/// lookup: invalid hour values are clamped by [`QuietHours::new`] and there
/// are no failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// When `false`, every queued item for this recipient is skipped
    /// without being sent.
    pub smart_enabled: bool,
    /// Window during which sends are deferred to the window's end.
    pub quiet_hours: QuietHours,
}

impl Default for DeliveryPolicy {
    /// Policy applied to recipients with no stored preference: enabled,
    /// with the default overnight quiet hours.
    fn default() -> Self {
        Self {
            smart_enabled: true,
            quiet_hours: QuietHours::default_window(),
        }
    }
}
