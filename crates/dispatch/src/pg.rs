//! Postgres-backed [`NotificationStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use dealdrop_core::types::{DbId, Timestamp};
use dealdrop_db::models::notification::{DeliveryPreference, QueuedNotification};
use dealdrop_db::repositories::{
    NotificationPreferenceRepo, NotificationQueueRepo, PushDeviceRepo, UserRepo,
};
use dealdrop_db::DbPool;

use crate::store::{NotificationStore, StoreError};

/// Store implementation delegating to the `dealdrop-db` repositories.
///
/// Cheap to clone; holds only the connection pool handle.
#[derive(Clone)]
pub struct PgNotificationStore {
    pool: DbPool,
}

impl PgNotificationStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn fetch_ready(
        &self,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<QueuedNotification>, StoreError> {
        Ok(NotificationQueueRepo::fetch_ready(&self.pool, now, limit).await?)
    }

    async fn fetch_preferences(
        &self,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, DeliveryPreference>, StoreError> {
        let rows = NotificationPreferenceRepo::list_for_users(&self.pool, user_ids).await?;
        Ok(rows.into_iter().map(|p| (p.user_id, p)).collect())
    }

    async fn fetch_active_tokens(
        &self,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<String>>, StoreError> {
        let devices = PushDeviceRepo::list_active_for_users(&self.pool, user_ids).await?;
        let mut tokens: HashMap<DbId, Vec<String>> = HashMap::new();
        for device in devices {
            tokens.entry(device.user_id).or_default().push(device.token);
        }
        Ok(tokens)
    }

    async fn mark_sent(&self, ids: &[DbId]) -> Result<(), StoreError> {
        NotificationQueueRepo::mark_sent(&self.pool, ids).await?;
        Ok(())
    }

    async fn mark_skipped(&self, ids: &[DbId], reason: &str) -> Result<(), StoreError> {
        NotificationQueueRepo::mark_skipped(&self.pool, ids, reason).await?;
        Ok(())
    }

    async fn reschedule(&self, id: DbId, scheduled_for: Timestamp) -> Result<bool, StoreError> {
        Ok(NotificationQueueRepo::reschedule(&self.pool, id, scheduled_for).await?)
    }

    async fn increment_attempts(&self, ids: &[DbId]) -> Result<(), StoreError> {
        Ok(NotificationQueueRepo::increment_attempts(&self.pool, ids).await?)
    }

    async fn resolve_usernames(
        &self,
        usernames: &[String],
    ) -> Result<HashMap<String, DbId>, StoreError> {
        let users = UserRepo::list_by_usernames(&self.pool, usernames).await?;
        Ok(users.into_iter().map(|u| (u.username, u.id)).collect())
    }
}
