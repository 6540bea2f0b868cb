//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Reads are batch-shaped (one
//! round-trip per recipient set, never per item) and status writes are
//! guarded on the expected prior state so re-running a cycle is safe.

pub mod notification_preference_repo;
pub mod notification_queue_repo;
pub mod push_device_repo;
pub mod user_repo;

pub use notification_preference_repo::NotificationPreferenceRepo;
pub use notification_queue_repo::NotificationQueueRepo;
pub use push_device_repo::PushDeviceRepo;
pub use user_repo::UserRepo;
