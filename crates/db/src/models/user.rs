//! Minimal user lookup model.

use dealdrop_core::types::DbId;
use sqlx::FromRow;

/// The (id, username) pair needed to resolve `@mention` handles.
#[derive(Debug, Clone, FromRow)]
pub struct UserRef {
    pub id: DbId,
    pub username: String,
}
