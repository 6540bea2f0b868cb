//! Queue drain cycle.
//!
//! [`QueueDrainer::drain_once`] processes one bounded batch of ready queue
//! items to completion: resolve each recipient's delivery policy, defer
//! items inside quiet hours, collapse within-cycle duplicates, resolve
//! device tokens, and submit the survivors to the push gateway in bounded
//! sub-batches. Sent status is written back as each sub-batch's gateway
//! call returns, so a cancelled invocation loses at most the current
//! sub-batch of progress; everything not yet submitted stays queued and is
//! picked up by the next cycle.

use std::collections::{BTreeMap, HashSet};

use chrono::Timelike;
use dealdrop_core::dedupe::DedupeTracker;
use dealdrop_core::policy::DeliveryPolicy;
use dealdrop_core::types::{DbId, Timestamp};
use serde::Serialize;

use crate::gateway::{PushGateway, PushMessage};
use crate::store::{NotificationStore, StoreError};

/// Upper bound on queue rows examined per cycle.
pub const DEFAULT_BATCH_LIMIT: i64 = 500;

/// Maximum messages per gateway submission.
pub const DEFAULT_SUB_BATCH_SIZE: usize = 100;

/// Submission attempts after which an item is terminally skipped instead
/// of lingering in the queue forever.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 10;

/// Machine-readable reasons recorded on skipped items.
pub mod skip_reason {
    /// The recipient has notifications disabled.
    pub const OPTED_OUT: &str = "opted_out";
    /// An equivalent notification was already delivered this cycle.
    pub const DUPLICATE: &str = "duplicate";
    /// The recipient has no active device tokens.
    pub const NO_DESTINATION: &str = "no_destination";
    /// The item exhausted its submission attempts.
    pub const MAX_ATTEMPTS: &str = "max_attempts";
}

// ---------------------------------------------------------------------------
// Config / report
// ---------------------------------------------------------------------------

/// Tunables for one drainer instance.
#[derive(Debug, Clone)]
pub struct DrainConfig {
    /// Maximum queue rows read per cycle.
    pub batch_limit: i64,
    /// Maximum messages per gateway call.
    pub sub_batch_size: usize,
    /// Attempt count at which an item is dead-lettered.
    pub max_attempts: i32,
}

impl Default for DrainConfig {
    fn default() -> Self {
        Self {
            batch_limit: DEFAULT_BATCH_LIMIT,
            sub_batch_size: DEFAULT_SUB_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Outcome counts for one drain cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    /// Ready items read from the queue.
    pub processed: usize,
    /// Items marked sent.
    pub sent: usize,
    /// Distinct gateway submissions that succeeded.
    pub sent_groups: usize,
    /// Items terminally skipped.
    pub skipped: usize,
    /// Items deferred out of quiet hours.
    pub rescheduled: usize,
    /// Gateway submissions that failed; their items stay queued.
    pub failed_groups: usize,
}

// ---------------------------------------------------------------------------
// QueueDrainer
// ---------------------------------------------------------------------------

/// All messages produced by one deliverable queue item (one per device).
/// Kept together so a failed gateway call never leaves an item half-sent.
struct DispatchGroup {
    item_id: DbId,
    messages: Vec<PushMessage>,
}

/// Drains the durable notification queue against a store and gateway.
pub struct QueueDrainer<S, G> {
    store: S,
    gateway: G,
    config: DrainConfig,
}

impl<S, G> QueueDrainer<S, G>
where
    S: NotificationStore,
    G: PushGateway,
{
    pub fn new(store: S, gateway: G) -> Self {
        Self::with_config(store, gateway, DrainConfig::default())
    }

    pub fn with_config(store: S, gateway: G, config: DrainConfig) -> Self {
        Self {
            store,
            gateway,
            config,
        }
    }

    /// Process one bounded batch of ready work.
    ///
    /// Store read failures abort the cycle before any status write; the
    /// queue is untouched and the next trigger retries. Gateway and store
    /// write failures are scoped to their sub-batch and logged.
    pub async fn drain_once(&self, now: Timestamp) -> Result<DrainReport, StoreError> {
        let items = self
            .store
            .fetch_ready(now, self.config.batch_limit)
            .await?;
        if items.is_empty() {
            tracing::debug!("Notification queue empty, nothing to drain");
            return Ok(DrainReport::default());
        }

        // Batch-load policy inputs for every recipient in the read set.
        let recipient_ids = unique_recipients(&items);
        let preferences = self.store.fetch_preferences(&recipient_ids).await?;
        let tokens = self.store.fetch_active_tokens(&recipient_ids).await?;

        let mut report = DrainReport {
            processed: items.len(),
            ..Default::default()
        };
        let mut dedupe = DedupeTracker::new();
        let mut skips: Vec<(DbId, &'static str)> = Vec::new();
        let mut groups: Vec<DispatchGroup> = Vec::new();
        let current_hour = now.hour();

        for item in &items {
            if item.attempts >= self.config.max_attempts {
                skips.push((item.id, skip_reason::MAX_ATTEMPTS));
                continue;
            }

            let policy = preferences
                .get(&item.user_id)
                .map(|p| p.policy())
                .unwrap_or_else(DeliveryPolicy::default);

            if !policy.smart_enabled {
                skips.push((item.id, skip_reason::OPTED_OUT));
                continue;
            }

            if policy.quiet_hours.contains(current_hour) {
                // Persisted immediately so the deferral survives a cycle
                // that dies before its batched writes.
                let resume_at = policy.quiet_hours.next_exit(now);
                match self.store.reschedule(item.id, resume_at).await {
                    Ok(true) => report.rescheduled += 1,
                    Ok(false) => tracing::warn!(
                        item_id = item.id,
                        "Reschedule refused, scheduled_for would not advance"
                    ),
                    Err(e) => tracing::error!(
                        item_id = item.id,
                        error = %e,
                        "Failed to reschedule item out of quiet hours"
                    ),
                }
                continue;
            }

            if !dedupe.first_occurrence(item.dedupe_identity()) {
                skips.push((item.id, skip_reason::DUPLICATE));
                continue;
            }

            let Some(user_tokens) = tokens.get(&item.user_id).filter(|t| !t.is_empty()) else {
                skips.push((item.id, skip_reason::NO_DESTINATION));
                continue;
            };

            let messages = user_tokens
                .iter()
                .map(|token| PushMessage {
                    to: token.clone(),
                    title: item.title.clone(),
                    body: item.body.clone(),
                    route: item.route.clone(),
                    data: item.data.clone(),
                })
                .collect();
            groups.push(DispatchGroup {
                item_id: item.id,
                messages,
            });
        }

        // Submit and write back one sub-batch at a time.
        for sub_batch in pack_groups(&groups, self.config.sub_batch_size) {
            let ids: Vec<DbId> = sub_batch.iter().map(|g| g.item_id).collect();
            let messages: Vec<PushMessage> = sub_batch
                .iter()
                .flat_map(|g| g.messages.iter().cloned())
                .collect();

            if let Err(e) = self.store.increment_attempts(&ids).await {
                tracing::warn!(items = ids.len(), error = %e, "Failed to increment attempt counters");
            }

            match self.gateway.send_batch(&messages).await {
                Ok(()) => {
                    report.sent_groups += 1;
                    match self.store.mark_sent(&ids).await {
                        Ok(()) => report.sent += ids.len(),
                        // Items stay queued; the guarded update makes the
                        // retried transition next cycle a no-op for any
                        // row this write did reach.
                        Err(e) => tracing::error!(
                            items = ids.len(),
                            error = %e,
                            "Failed to mark items sent after gateway submission"
                        ),
                    }
                }
                Err(e) => {
                    report.failed_groups += 1;
                    tracing::error!(
                        items = ids.len(),
                        messages = messages.len(),
                        error = %e,
                        "Push gateway sub-batch failed, items stay queued"
                    );
                }
            }
        }

        // Terminal skips, one bulk write per reason.
        for (reason, ids) in group_by_reason(&skips) {
            match self.store.mark_skipped(&ids, reason).await {
                Ok(()) => report.skipped += ids.len(),
                Err(e) => tracing::error!(
                    reason,
                    items = ids.len(),
                    error = %e,
                    "Failed to mark items skipped"
                ),
            }
        }

        tracing::info!(
            processed = report.processed,
            sent = report.sent,
            sent_groups = report.sent_groups,
            skipped = report.skipped,
            rescheduled = report.rescheduled,
            failed_groups = report.failed_groups,
            "Drain cycle complete"
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Distinct recipient ids in first-seen order.
fn unique_recipients(items: &[dealdrop_db::models::notification::QueuedNotification]) -> Vec<DbId> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.user_id))
        .map(|item| item.user_id)
        .collect()
}

/// Pack dispatch groups into sub-batches of at most `cap` messages,
/// never splitting one item's messages across two gateway calls. A single
/// group larger than `cap` still goes out whole, as its own oversized
/// call.
fn pack_groups(groups: &[DispatchGroup], cap: usize) -> Vec<Vec<&DispatchGroup>> {
    let mut batches = Vec::new();
    let mut current: Vec<&DispatchGroup> = Vec::new();
    let mut count = 0;

    for group in groups {
        if !current.is_empty() && count + group.messages.len() > cap {
            batches.push(std::mem::take(&mut current));
            count = 0;
        }
        count += group.messages.len();
        current.push(group);
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

/// Group (item, reason) pairs into one id list per reason, in stable
/// reason order.
fn group_by_reason(skips: &[(DbId, &'static str)]) -> BTreeMap<&'static str, Vec<DbId>> {
    let mut by_reason: BTreeMap<&'static str, Vec<DbId>> = BTreeMap::new();
    for &(id, reason) in skips {
        by_reason.entry(reason).or_default().push(id);
    }
    by_reason
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
