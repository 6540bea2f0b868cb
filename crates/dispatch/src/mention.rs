//! Immediate fan-out for comment mentions and replies.
//!
//! Runs once per new-comment event, bypassing the durable queue: mentioned
//! users and the parent-comment author are resolved to device tokens and
//! pushed right away, with no dedupe and no quiet-hours deferral. Gateway
//! failures are logged and not retried (fire-and-forget).

use std::collections::{BTreeSet, HashMap};

use dealdrop_core::categories::CATEGORY_MENTION;
use dealdrop_core::mentions::{extract_mentions, snippet};
use dealdrop_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::drain::DEFAULT_SUB_BATCH_SIZE;
use crate::gateway::{PushGateway, PushMessage};
use crate::store::{NotificationStore, StoreError};

/// Title used for every mention/reply push.
const FANOUT_TITLE: &str = "New comment activity";

// ---------------------------------------------------------------------------
// Event / report
// ---------------------------------------------------------------------------

/// A freshly created comment to fan out.
///
/// All fields except `parent_user_id` are required; deserialization of the
/// trigger payload fails before any store access when one is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentEvent {
    pub deal_id: DbId,
    pub comment_id: DbId,
    /// The comment author, always excluded from the recipient set.
    pub author_id: DbId,
    pub content: String,
    /// Author of the comment being replied to, if any.
    #[serde(default)]
    pub parent_user_id: Option<DbId>,
}

/// Counts for one fan-out invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FanoutReport {
    /// Users in the final recipient set (mentions ∪ parent author, minus
    /// the comment author).
    pub recipients: usize,
    /// Messages accepted by the gateway.
    pub messages: usize,
    /// Gateway submissions that failed; those messages are dropped.
    pub failed_groups: usize,
}

// ---------------------------------------------------------------------------
// MentionFanout
// ---------------------------------------------------------------------------

/// Resolves and dispatches mention/reply notifications for one comment.
pub struct MentionFanout<S, G> {
    store: S,
    gateway: G,
    sub_batch_size: usize,
}

impl<S, G> MentionFanout<S, G>
where
    S: NotificationStore,
    G: PushGateway,
{
    pub fn new(store: S, gateway: G) -> Self {
        Self {
            store,
            gateway,
            sub_batch_size: DEFAULT_SUB_BATCH_SIZE,
        }
    }

    /// Notify everyone the comment concerns.
    ///
    /// Unknown mention handles are silently dropped. An empty recipient
    /// set succeeds trivially with zero messages.
    pub async fn notify(&self, event: &CommentEvent) -> Result<FanoutReport, StoreError> {
        let names = extract_mentions(&event.content);
        let resolved: HashMap<String, DbId> = if names.is_empty() {
            HashMap::new()
        } else {
            self.store.resolve_usernames(&names).await?
        };

        let mut recipients: BTreeSet<DbId> = resolved.values().copied().collect();
        if let Some(parent_author) = event.parent_user_id {
            recipients.insert(parent_author);
        }
        recipients.remove(&event.author_id);

        if recipients.is_empty() {
            tracing::debug!(
                comment_id = event.comment_id,
                "Comment has no one to notify"
            );
            return Ok(FanoutReport::default());
        }

        let recipient_ids: Vec<DbId> = recipients.into_iter().collect();
        let tokens = self.store.fetch_active_tokens(&recipient_ids).await?;

        let body = snippet(&event.content);
        let route = format!("/deal?id={}&comment={}", event.deal_id, event.comment_id);
        let data = serde_json::json!({
            "category": CATEGORY_MENTION,
            "deal_id": event.deal_id,
            "comment_id": event.comment_id,
        });

        let messages: Vec<PushMessage> = recipient_ids
            .iter()
            .filter_map(|id| tokens.get(id))
            .flatten()
            .map(|token| PushMessage {
                to: token.clone(),
                title: FANOUT_TITLE.into(),
                body: body.clone(),
                route: route.clone(),
                data: data.clone(),
            })
            .collect();

        let mut report = FanoutReport {
            recipients: recipient_ids.len(),
            ..Default::default()
        };

        for chunk in messages.chunks(self.sub_batch_size) {
            match self.gateway.send_batch(chunk).await {
                Ok(()) => report.messages += chunk.len(),
                Err(e) => {
                    report.failed_groups += 1;
                    tracing::error!(
                        comment_id = event.comment_id,
                        messages = chunk.len(),
                        error = %e,
                        "Mention fan-out sub-batch failed"
                    );
                }
            }
        }

        tracing::info!(
            comment_id = event.comment_id,
            recipients = report.recipients,
            messages = report.messages,
            failed_groups = report.failed_groups,
            "Mention fan-out complete"
        );
        Ok(report)
    }
}
