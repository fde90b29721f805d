use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Creates the PostgreSQL connection pool.
///
/// A short acquire timeout keeps a saturated pool from stalling the
/// request path; the engine's own time budget handles the rest.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    Ok(pool)
}
