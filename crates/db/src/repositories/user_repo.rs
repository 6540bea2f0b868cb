//! Repository for the `users` table (mention resolution only).

use sqlx::PgPool;

use crate::models::user::UserRef;

/// Provides username-to-id resolution for mention fan-out.
pub struct UserRepo;

impl UserRepo {
    /// Resolve usernames to user ids in one query. Unknown usernames are
    /// simply absent from the result.
    pub async fn list_by_usernames(
        pool: &PgPool,
        usernames: &[String],
    ) -> Result<Vec<UserRef>, sqlx::Error> {
        sqlx::query_as::<_, UserRef>(
            "SELECT id, username FROM users WHERE username = ANY($1)",
        )
        .bind(usernames)
        .fetch_all(pool)
        .await
    }
}
