//! Per-recipient quiet-hours window math.
//!
//! A quiet-hours window is a pair of hour-of-day values `[start, end)`
//! evaluated against a single shared clock reference (UTC). During the
//! window, queued notifications are deferred rather than delivered.

use chrono::{Duration, Timelike};

use crate::types::Timestamp;

/// Default window start when a recipient has no stored preference (22:00).
pub const DEFAULT_QUIET_START: i32 = 22;

/// Default window end when a recipient has no stored preference (07:00).
pub const DEFAULT_QUIET_END: i32 = 7;

// ---------------------------------------------------------------------------
// QuietHours
// ---------------------------------------------------------------------------

/// An hour-of-day window `[start, end)` during which sends are deferred.
///
/// - `start == end` means the window is disabled (never matches).
/// - `start < end` is a same-day span `[start, end)`.
/// - `start > end` crosses midnight and covers `[start, 24) ∪ [0, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietHours {
    start: u32,
    end: u32,
}

impl QuietHours {
    /// Build a window from raw hour values, clamped into `[0, 24)` via
    /// modulo so malformed preference rows cannot panic the pipeline.
    pub fn new(start: i32, end: i32) -> Self {
        Self {
            start: start.rem_euclid(24) as u32,
            end: end.rem_euclid(24) as u32,
        }
    }

    /// The default overnight window, 22:00 to 07:00.
    pub fn default_window() -> Self {
        Self::new(DEFAULT_QUIET_START, DEFAULT_QUIET_END)
    }

    /// Whether the given hour-of-day falls inside the window.
    pub fn contains(&self, hour: u32) -> bool {
        let h = hour % 24;
        if self.start == self.end {
            false
        } else if self.start < self.end {
            self.start <= h && h < self.end
        } else {
            h >= self.start || h < self.end
        }
    }

    /// The instant at which a send deferred at `now` becomes eligible again.
    ///
    /// Computes the whole-hour delta from the current hour to the window's
    /// end (on the next day when the window crosses midnight) and adds it to
    /// `now`. The result is always strictly after `now`, so rescheduling can
    /// only ever move `scheduled_for` forward.
    pub fn next_exit(&self, now: Timestamp) -> Timestamp {
        let hour = now.hour();
        let delta = (i64::from(self.end) - i64::from(hour)).rem_euclid(24);
        now + Duration::hours(delta.max(1))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn overnight_window_membership() {
        let window = QuietHours::new(22, 7);
        assert!(window.contains(23));
        assert!(window.contains(22));
        assert!(window.contains(0));
        assert!(window.contains(6));
        assert!(!window.contains(7));
        assert!(!window.contains(12));
        assert!(!window.contains(21));
    }

    #[test]
    fn same_day_window_membership() {
        let window = QuietHours::new(9, 17);
        assert!(window.contains(9));
        assert!(window.contains(12));
        assert!(!window.contains(17));
        assert!(!window.contains(8));
    }

    #[test]
    fn equal_start_end_disables_window() {
        let window = QuietHours::new(9, 9);
        for hour in 0..24 {
            assert!(!window.contains(hour), "hour {hour} must not match");
        }
    }

    #[test]
    fn raw_hours_are_clamped_modulo_24() {
        let window = QuietHours::new(25, -3);
        assert_eq!(window, QuietHours::new(1, 21));
        assert!(window.contains(1));
        assert!(!window.contains(21));
    }

    #[test]
    fn next_exit_same_day() {
        let window = QuietHours::new(9, 17);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 12, 30, 0).unwrap();
        let exit = window.next_exit(now);
        assert!(exit > now);
        assert_eq!(exit, Utc.with_ymd_and_hms(2025, 6, 2, 17, 30, 0).unwrap());
    }

    #[test]
    fn next_exit_crosses_midnight() {
        let window = QuietHours::new(22, 7);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 23, 15, 0).unwrap();
        let exit = window.next_exit(now);
        assert!(exit > now);
        assert_eq!(exit.hour(), 7);
        assert_eq!(exit, Utc.with_ymd_and_hms(2025, 6, 3, 7, 15, 0).unwrap());
    }

    #[test]
    fn next_exit_early_morning_lands_same_day() {
        let window = QuietHours::new(22, 7);
        let now = Utc.with_ymd_and_hms(2025, 6, 3, 3, 0, 0).unwrap();
        let exit = window.next_exit(now);
        assert_eq!(exit, Utc.with_ymd_and_hms(2025, 6, 3, 7, 0, 0).unwrap());
    }

    #[test]
    fn next_exit_is_strictly_forward_even_at_boundary() {
        // Not in-window, but the invariant must hold regardless of caller
        // discipline: the result never equals `now`.
        let window = QuietHours::new(22, 7);
        let now = Utc.with_ymd_and_hms(2025, 6, 3, 7, 0, 0).unwrap();
        assert!(window.next_exit(now) > now);
    }
}
