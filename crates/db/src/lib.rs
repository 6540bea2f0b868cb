//! Dealdrop data access layer.
//!
//! Row models and repositories for the notification pipeline's tables:
//! the durable `notification_queue`, per-user `notification_preferences`,
//! registered `push_devices`, and the `users` lookup needed for mention
//! resolution. Repositories are zero-sized structs providing async methods
//! that take `&PgPool` as the first argument.

pub mod models;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, health_check, DbPool};
