use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use trailhead_api::{
    error::{AppError, AppResult},
    models::{EngagementStats, TripCandidate},
    services::{
        catalog::CatalogStore,
        engagement::EngagementStore,
        filter::{CandidateQuery, SearchMode},
    },
};

/// Frozen clock shared by the integration tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Baseline bookable candidate; tests overwrite the fields they care about.
pub fn trip(id: u128) -> TripCandidate {
    TripCandidate {
        occurrence_id: Uuid::from_u128(id),
        template_id: Uuid::from_u128(id + 10_000),
        title: format!("Trip {}", id),
        description: "A guided small-group trip".to_string(),
        trip_style: "trekking".to_string(),
        primary_country: "PE".to_string(),
        countries: vec!["PE".to_string()],
        themes: vec!["hiking".to_string()],
        difficulty: 3,
        start_date: date(2026, 10, 5),
        end_date: None,
        duration_days: 7,
        price_cents: 90_000,
        status: trailhead_api::models::OccurrenceStatus::Open,
        spots_left: 8,
        guide_name: None,
        created_at: Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
    }
}

/// In-memory catalog that applies the query predicates the way the real
/// store does: bookable inventory only, window and preference predicates,
/// deterministic (start date, id) ordering, capped at the query limit.
pub struct InMemoryCatalog {
    pub trips: Vec<TripCandidate>,
}

impl InMemoryCatalog {
    pub fn new(trips: Vec<TripCandidate>) -> Self {
        Self { trips }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<TripCandidate>> {
        let mut hits: Vec<TripCandidate> = self
            .trips
            .iter()
            .filter(|t| t.status.is_bookable() && t.spots_left > 0)
            .filter(|t| t.start_date >= query.window_start && t.start_date <= query.window_end)
            .filter(|t| {
                query.countries.is_empty()
                    || t.countries.iter().any(|c| query.countries.contains(c))
            })
            .filter(|t| {
                query
                    .trip_style
                    .as_ref()
                    .map_or(true, |style| &t.trip_style == style)
            })
            .filter(|t| match (query.difficulty_min, query.difficulty_max) {
                (Some(min), Some(max)) => (min..=max).contains(&t.difficulty),
                _ => true,
            })
            .filter(|t| {
                query
                    .max_price_cents
                    .map_or(true, |ceiling| t.price_cents <= ceiling)
            })
            .cloned()
            .collect();

        hits.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then(a.occurrence_id.cmp(&b.occurrence_id))
        });
        hits.truncate(query.limit as usize);

        Ok(hits)
    }
}

/// Catalog that is down entirely.
pub struct FailingCatalog;

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn fetch_candidates(&self, _query: &CandidateQuery) -> AppResult<Vec<TripCandidate>> {
        Err(AppError::StoreUnavailable("catalog offline".to_string()))
    }
}

/// Catalog that answers only after a long delay.
pub struct SlowCatalog {
    pub inner: InMemoryCatalog,
    pub delay: Duration,
}

#[async_trait]
impl CatalogStore for SlowCatalog {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<TripCandidate>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_candidates(query).await
    }
}

/// Catalog that serves the strict pass but fails the widened one.
pub struct FlakyRelaxedCatalog {
    pub inner: InMemoryCatalog,
}

#[async_trait]
impl CatalogStore for FlakyRelaxedCatalog {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<TripCandidate>> {
        match query.mode {
            SearchMode::Primary => self.inner.fetch_candidates(query).await,
            SearchMode::Relaxed => {
                Err(AppError::StoreUnavailable("replica offline".to_string()))
            }
        }
    }
}

/// Catalog that serves the strict pass promptly but stalls on the widened one.
pub struct SlowRelaxedCatalog {
    pub inner: InMemoryCatalog,
    pub delay: Duration,
}

#[async_trait]
impl CatalogStore for SlowRelaxedCatalog {
    async fn fetch_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<TripCandidate>> {
        if query.mode == SearchMode::Relaxed {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.fetch_candidates(query).await
    }
}

/// In-memory engagement counters keyed by occurrence.
pub struct InMemoryEngagement {
    pub stats: HashMap<Uuid, EngagementStats>,
}

impl InMemoryEngagement {
    pub fn empty() -> Self {
        Self {
            stats: HashMap::new(),
        }
    }

    pub fn with(stats: Vec<EngagementStats>) -> Self {
        Self {
            stats: stats.into_iter().map(|s| (s.occurrence_id, s)).collect(),
        }
    }
}

#[async_trait]
impl EngagementStore for InMemoryEngagement {
    async fn fetch_stats(
        &self,
        occurrence_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, EngagementStats>> {
        Ok(occurrence_ids
            .iter()
            .filter_map(|id| self.stats.get(id).cloned())
            .map(|s| (s.occurrence_id, s))
            .collect())
    }
}

/// Engagement store that is down entirely.
pub struct FailingEngagement;

#[async_trait]
impl EngagementStore for FailingEngagement {
    async fn fetch_stats(
        &self,
        _occurrence_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, EngagementStats>> {
        Err(AppError::StoreUnavailable("stats pipeline offline".to_string()))
    }
}

/// Engagement store that answers only after a long delay.
pub struct SlowEngagement {
    pub inner: InMemoryEngagement,
    pub delay: Duration,
}

#[async_trait]
impl EngagementStore for SlowEngagement {
    async fn fetch_stats(
        &self,
        occurrence_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, EngagementStats>> {
        tokio::time::sleep(self.delay).await;
        self.inner.fetch_stats(occurrence_ids).await
    }
}
