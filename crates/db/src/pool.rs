//! Connection pool helpers.

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Pool size suited to the pipeline's small, bursty batch workload.
const MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
