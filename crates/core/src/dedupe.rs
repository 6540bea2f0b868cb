//! Within-cycle notification dedupe.
//!
//! Multiple queued notifications that are equivalent for a recipient are
//! collapsed to a single delivery per drain cycle. Equivalence is decided
//! by an application-supplied dedupe key when present, falling back to the
//! (category, route) pair otherwise. The tracker holds no cross-cycle
//! state: an identity is free to fire again in the next cycle.

use std::collections::HashSet;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// What makes two queued notifications "the same" for dedupe purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupeKey {
    /// An explicit producer-supplied key, e.g. `"weekly-digest"`.
    Explicit(String),
    /// Fallback when no explicit key exists: same kind of alert pointing
    /// at the same destination.
    RouteFallback { category: String, route: String },
}

/// A dedupe key scoped to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupeIdentity {
    pub recipient: DbId,
    pub key: DedupeKey,
}

impl DedupeIdentity {
    /// Build the identity for a queued notification.
    pub fn new(recipient: DbId, dedupe_key: Option<&str>, category: &str, route: &str) -> Self {
        let key = match dedupe_key {
            Some(k) => DedupeKey::Explicit(k.to_string()),
            None => DedupeKey::RouteFallback {
                category: category.to_string(),
                route: route.to_string(),
            },
        };
        Self { recipient, key }
    }
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// Set-membership tracker for one drain cycle.
///
/// Items are fed in `scheduled_for` order, so the first occurrence of an
/// identity is the oldest queued item; later occurrences are skipped.
#[derive(Debug, Default)]
pub struct DedupeTracker {
    seen: HashSet<DedupeIdentity>,
}

impl DedupeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identity and report whether it is the first occurrence
    /// in this cycle.
    pub fn first_occurrence(&mut self, identity: DedupeIdentity) -> bool {
        self.seen.insert(identity)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
