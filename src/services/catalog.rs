use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{effective_duration_days, OccurrenceStatus, TripCandidate},
};

use super::filter::CandidateQuery;

/// Read access to the bookable trip inventory.
///
/// Abstracted behind a trait so the engine can be exercised against
/// in-memory stores in tests while production talks to Postgres.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetches candidates matching the query's predicates, ordered by
    /// (start date, occurrence id) and truncated at the query limit.
    async fn fetch_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<TripCandidate>>;
}

/// Postgres-backed catalog reader.
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgCatalogStore {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<TripCandidate>> {
        let mut builder = candidate_query_builder(query);

        let rows = builder
            .build_query_as::<CandidateRow>()
            .fetch_all(&self.pool)
            .await?;

        let fetched = rows.len();
        let candidates: Vec<TripCandidate> =
            rows.into_iter().filter_map(CandidateRow::into_candidate).collect();

        tracing::debug!(
            mode = ?query.mode,
            fetched,
            usable = candidates.len(),
            "Fetched trip candidates"
        );

        Ok(candidates)
    }
}

/// Builds the candidate SQL for one pass.
///
/// The fixed predicates keep unsellable inventory out at the source:
/// inactive templates, cancelled or full departures, and sold-out
/// occurrences never reach the scorer. Optional predicates are appended
/// only when the query carries them.
fn candidate_query_builder(query: &CandidateQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        r#"
        SELECT o.id AS occurrence_id, o.template_id, t.title, t.description,
            t.trip_style, t.primary_country, t.countries, t.themes, t.difficulty,
            o.start_date, o.end_date, t.typical_duration_days,
            COALESCE(o.price_cents, t.base_price_cents) AS price_cents,
            o.status, o.spots_left, o.guide_name, o.created_at
        FROM trip_occurrences o
        JOIN trip_templates t ON t.id = o.template_id
        WHERE t.active = TRUE
          AND o.status NOT IN ('cancelled', 'full')
          AND o.spots_left > 0
        "#,
    );

    builder.push(" AND o.start_date >= ");
    builder.push_bind(query.window_start);
    builder.push(" AND o.start_date <= ");
    builder.push_bind(query.window_end);

    if !query.countries.is_empty() {
        builder.push(" AND t.countries && ");
        builder.push_bind(query.countries.clone());
    }

    if let Some(style) = &query.trip_style {
        builder.push(" AND t.trip_style = ");
        builder.push_bind(style.clone());
    }

    if let (Some(min), Some(max)) = (query.difficulty_min, query.difficulty_max) {
        builder.push(" AND t.difficulty BETWEEN ");
        builder.push_bind(i16::from(min));
        builder.push(" AND ");
        builder.push_bind(i16::from(max));
    }

    if let Some(max_price) = query.max_price_cents {
        builder.push(" AND COALESCE(o.price_cents, t.base_price_cents) <= ");
        builder.push_bind(max_price);
    }

    builder.push(" ORDER BY o.start_date ASC, o.id ASC LIMIT ");
    builder.push_bind(query.limit);

    builder
}

/// Raw join row as Postgres returns it.
#[derive(Debug, sqlx::FromRow)]
struct CandidateRow {
    occurrence_id: Uuid,
    template_id: Uuid,
    title: String,
    description: String,
    trip_style: String,
    primary_country: String,
    countries: Vec<String>,
    themes: Vec<String>,
    difficulty: i16,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    typical_duration_days: i32,
    price_cents: i64,
    status: String,
    spots_left: i32,
    guide_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl CandidateRow {
    /// Converts a raw row into a scoring candidate.
    ///
    /// Rows with a status the engine does not recognize are dropped with
    /// a warning rather than failing the whole fetch.
    fn into_candidate(self) -> Option<TripCandidate> {
        let Some(status) = OccurrenceStatus::parse(&self.status) else {
            tracing::warn!(
                occurrence_id = %self.occurrence_id,
                status = %self.status,
                "Skipping occurrence with unrecognized status"
            );
            return None;
        };

        if !status.is_bookable() {
            tracing::warn!(
                occurrence_id = %self.occurrence_id,
                status = %self.status,
                "Skipping unbookable occurrence that slipped past the query"
            );
            return None;
        }

        let duration_days = effective_duration_days(
            self.start_date,
            self.end_date,
            self.typical_duration_days.max(0) as u32,
        );

        Some(TripCandidate {
            occurrence_id: self.occurrence_id,
            template_id: self.template_id,
            title: self.title,
            description: self.description,
            trip_style: self.trip_style,
            primary_country: self.primary_country,
            countries: self.countries,
            themes: self.themes,
            difficulty: self.difficulty.clamp(1, 5) as u8,
            start_date: self.start_date,
            end_date: self.end_date,
            duration_days,
            price_cents: self.price_cents,
            status,
            spots_left: self.spots_left.max(0) as u32,
            guide_name: self.guide_name,
            created_at: self.created_at,
        })
    }
}
