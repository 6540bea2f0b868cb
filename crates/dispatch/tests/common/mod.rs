//! In-memory store and gateway fakes shared by the pipeline test binaries.
//!
//! `MemoryStore` mirrors the contract of the Postgres store, including the
//! status-guarded transitions and forward-only rescheduling, so the drain
//! and fan-out paths can be exercised end-to-end without a database.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use dealdrop_core::types::{DbId, Timestamp};
use dealdrop_db::models::notification::{
    DeliveryPreference, QueuedNotification, STATUS_QUEUED, STATUS_SENT, STATUS_SKIPPED,
};
use dealdrop_dispatch::{GatewayError, NotificationStore, PushGateway, PushMessage, StoreError};

/// A fixed reference day at `hour:30:00` UTC.
pub fn at_hour(hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 2, hour, 30, 0).unwrap()
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreInner {
    items: Mutex<Vec<QueuedNotification>>,
    prefs: Mutex<HashMap<DbId, DeliveryPreference>>,
    tokens: Mutex<HashMap<DbId, Vec<String>>>,
    users: Mutex<HashMap<String, DbId>>,
    fail_reads: Mutex<bool>,
}

/// Cheaply cloneable in-memory [`NotificationStore`].
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_item(&self, item: QueuedNotification) {
        self.inner.items.lock().unwrap().push(item);
    }

    pub fn set_pref(&self, pref: DeliveryPreference) {
        self.inner.prefs.lock().unwrap().insert(pref.user_id, pref);
    }

    pub fn set_tokens(&self, user_id: DbId, tokens: &[&str]) {
        self.inner
            .tokens
            .lock()
            .unwrap()
            .insert(user_id, tokens.iter().map(|t| t.to_string()).collect());
    }

    pub fn add_user(&self, username: &str, id: DbId) {
        self.inner.users.lock().unwrap().insert(username.into(), id);
    }

    /// Make every read fail with [`StoreError::Unavailable`].
    pub fn fail_reads(&self) {
        *self.inner.fail_reads.lock().unwrap() = true;
    }

    /// Snapshot one item by id. Panics when the id is unknown.
    pub fn item(&self, id: DbId) -> QueuedNotification {
        self.inner
            .items
            .lock()
            .unwrap()
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .expect("item exists")
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if *self.inner.fail_reads.lock().unwrap() {
            Err(StoreError::Unavailable("injected read failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn fetch_ready(
        &self,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<QueuedNotification>, StoreError> {
        self.check_reads()?;
        let mut ready: Vec<QueuedNotification> = self
            .inner
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|item| item.status == STATUS_QUEUED && item.scheduled_for <= now)
            .cloned()
            .collect();
        ready.sort_by_key(|item| item.scheduled_for);
        ready.truncate(limit as usize);
        Ok(ready)
    }

    async fn fetch_preferences(
        &self,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, DeliveryPreference>, StoreError> {
        self.check_reads()?;
        let prefs = self.inner.prefs.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|id| prefs.get(id).map(|p| (*id, p.clone())))
            .collect())
    }

    async fn fetch_active_tokens(
        &self,
        user_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<String>>, StoreError> {
        self.check_reads()?;
        let tokens = self.inner.tokens.lock().unwrap();
        Ok(user_ids
            .iter()
            .filter_map(|id| tokens.get(id).map(|t| (*id, t.clone())))
            .collect())
    }

    async fn mark_sent(&self, ids: &[DbId]) -> Result<(), StoreError> {
        let mut items = self.inner.items.lock().unwrap();
        for item in items.iter_mut() {
            if ids.contains(&item.id) && item.status == STATUS_QUEUED {
                item.status = STATUS_SENT.into();
            }
        }
        Ok(())
    }

    async fn mark_skipped(&self, ids: &[DbId], reason: &str) -> Result<(), StoreError> {
        let mut items = self.inner.items.lock().unwrap();
        for item in items.iter_mut() {
            if ids.contains(&item.id) && item.status == STATUS_QUEUED {
                item.status = STATUS_SKIPPED.into();
                item.skip_reason = Some(reason.into());
            }
        }
        Ok(())
    }

    async fn reschedule(&self, id: DbId, scheduled_for: Timestamp) -> Result<bool, StoreError> {
        let mut items = self.inner.items.lock().unwrap();
        for item in items.iter_mut() {
            if item.id == id && item.status == STATUS_QUEUED && item.scheduled_for < scheduled_for {
                item.scheduled_for = scheduled_for;
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn increment_attempts(&self, ids: &[DbId]) -> Result<(), StoreError> {
        let mut items = self.inner.items.lock().unwrap();
        for item in items.iter_mut() {
            if ids.contains(&item.id) && item.status == STATUS_QUEUED {
                item.attempts += 1;
            }
        }
        Ok(())
    }

    async fn resolve_usernames(
        &self,
        usernames: &[String],
    ) -> Result<HashMap<String, DbId>, StoreError> {
        self.check_reads()?;
        let users = self.inner.users.lock().unwrap();
        Ok(usernames
            .iter()
            .filter_map(|name| users.get(name).map(|id| (name.clone(), *id)))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// RecordingGateway
// ---------------------------------------------------------------------------

#[derive(Default)]
struct GatewayInner {
    batches: Mutex<Vec<Vec<PushMessage>>>,
    fail_calls: Mutex<HashSet<usize>>,
    calls: AtomicUsize,
}

/// Cheaply cloneable [`PushGateway`] that records successful submissions
/// and fails the call indexes it is told to.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    inner: Arc<GatewayInner>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the nth `send_batch` call (0-based) with an HTTP 503.
    pub fn fail_call(&self, index: usize) {
        self.inner.fail_calls.lock().unwrap().insert(index);
    }

    /// Successful submissions, in call order.
    pub fn batches(&self) -> Vec<Vec<PushMessage>> {
        self.inner.batches.lock().unwrap().clone()
    }

    /// Total `send_batch` calls, including failed ones.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushGateway for RecordingGateway {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<(), GatewayError> {
        let call = self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_calls.lock().unwrap().contains(&call) {
            return Err(GatewayError::HttpStatus(503));
        }
        self.inner.batches.lock().unwrap().push(messages.to_vec());
        Ok(())
    }
}
