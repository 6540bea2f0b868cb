//! Dealdrop notification dispatch pipeline.
//!
//! This crate is the delivery engine behind the app's push notifications:
//!
//! - [`QueueDrainer`] — periodic drain of the durable notification queue:
//!   per-recipient policy (opt-out, quiet hours), within-cycle dedupe,
//!   device resolution, and batched gateway submission with per-sub-batch
//!   status writeback.
//! - [`MentionFanout`] — event-driven sibling path that notifies mentioned
//!   users and parent-comment authors immediately, bypassing the queue.
//! - [`NotificationStore`] — the storage seam both paths run against, with
//!   a Postgres implementation in [`pg`].
//! - [`PushGateway`] — the outbound push seam, with an HTTP implementation
//!   in [`gateway`].

pub mod drain;
pub mod gateway;
pub mod mention;
pub mod pg;
pub mod store;

pub use drain::{DrainConfig, DrainReport, QueueDrainer};
pub use gateway::{GatewayError, HttpPushGateway, PushGateway, PushMessage};
pub use mention::{CommentEvent, FanoutReport, MentionFanout};
pub use pg::PgNotificationStore;
pub use store::{NotificationStore, StoreError};
