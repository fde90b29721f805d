use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::EngagementStats};

/// Read access to aggregated engagement counters.
///
/// Counters are maintained upstream by the analytics pipeline; the engine
/// only ever bulk-reads them for the occurrences it is about to rank.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EngagementStore: Send + Sync {
    /// Fetches stats for the given occurrences in one round trip.
    ///
    /// Occurrences with no counters yet are simply absent from the map.
    async fn fetch_stats(
        &self,
        occurrence_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, EngagementStats>>;
}

/// Postgres-backed engagement reader.
pub struct PgEngagementStore {
    pool: PgPool,
}

impl PgEngagementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl EngagementStore for PgEngagementStore {
    async fn fetch_stats(
        &self,
        occurrence_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, EngagementStats>> {
        if occurrence_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, EngagementStats>(
            r#"
            SELECT occurrence_id, impressions, clicks, clicks_7d, clicks_30d,
                saves, contacts
            FROM trip_engagement_stats
            WHERE occurrence_id = ANY($1)
            "#,
        )
        .bind(occurrence_ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            requested = occurrence_ids.len(),
            found = rows.len(),
            "Fetched engagement stats"
        );

        Ok(rows
            .into_iter()
            .map(|stats| (stats.occurrence_id, stats))
            .collect())
    }
}
