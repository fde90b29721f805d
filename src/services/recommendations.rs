use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{EngineConfig, ScoreThresholds},
    error::{AppError, AppResult},
    models::{EngagementStats, TravelPreferences, TripCandidate},
};

use super::{
    assembler::{assemble, RecommendedTrip},
    catalog::CatalogStore,
    engagement::EngagementStore,
    filter::{CandidateQuery, SearchMode},
    popularity::{blend_scores, popularity_score},
    scoring::{rank_cmp, score_candidate, ScoredCandidate},
};

/// Result of one recommendation search, plus the metadata clients need
/// to present it honestly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationOutcome {
    /// Ranked recommendations, best first, at most the requested limit.
    pub results: Vec<RecommendedTrip>,
    /// How many candidates the strict pass produced before ranking.
    pub primary_count: usize,
    /// How many of the returned results came from the widened pass.
    pub relaxed_count: usize,
    /// Whether the search was widened at all, even if the widened pass
    /// contributed nothing.
    pub has_relaxed_results: bool,
    /// Score bands for presentation, echoed so clients never hardcode them.
    pub thresholds: ScoreThresholds,
}

/// Runs the full recommendation flow for one traveler.
///
/// Strict search first; if that comes back under the floor, a widened
/// second pass fills out the list. The widened pass and the engagement
/// lookups are best-effort: their failures degrade the response rather
/// than erroring it. Only the strict pass failing is fatal, since without
/// it there is nothing defensible to return.
pub async fn recommend_trips(
    catalog: &dyn CatalogStore,
    engagement: &dyn EngagementStore,
    prefs: &TravelPreferences,
    limit: usize,
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> AppResult<RecommendationOutcome> {
    let started = Instant::now();
    let deadline = started + Duration::from_millis(config.search.request_timeout_ms);
    let today = now.date_naive();

    tracing::info!(
        countries = prefs.countries.len(),
        continents = prefs.continents.len(),
        themes = prefs.themes.len(),
        limit,
        "Starting recommendation search"
    );

    // 1. Strict pass over the traveler's exact preferences.
    let primary_query = CandidateQuery::build(prefs, SearchMode::Primary, today, &config.search);
    let primary = fetch_bounded(catalog, &primary_query, deadline).await?;
    let primary_count = primary.len();

    let mut scored: Vec<ScoredCandidate> = primary
        .into_iter()
        .map(|candidate| score_candidate(candidate, prefs, config, false))
        .collect();

    // 2. Decide whether to widen. The floor is about usefulness: a page
    //    of two results reads as "we have nothing for you".
    let widen = primary_count < config.search.min_results_floor;
    if widen {
        tracing::info!(
            primary_count,
            floor = config.search.min_results_floor,
            "Primary results under floor, widening search"
        );
    }

    let relaxed_query =
        widen.then(|| CandidateQuery::build(prefs, SearchMode::Relaxed, today, &config.search));

    let blend = config.popularity.blend_enabled;
    let primary_ids: Vec<Uuid> = scored
        .iter()
        .map(|s| s.candidate.occurrence_id)
        .collect();

    // 3. Widened fetch and engagement lookup run concurrently; both are
    //    best-effort from here on.
    let relaxed_fut = async {
        match &relaxed_query {
            Some(query) => fetch_candidates_absorbing(catalog, query, deadline).await,
            None => Vec::new(),
        }
    };
    let engagement_fut = async {
        if blend && !primary_ids.is_empty() {
            fetch_stats_absorbing(engagement, &primary_ids, deadline).await
        } else {
            HashMap::new()
        }
    };
    let (relaxed_candidates, mut stats) = tokio::join!(relaxed_fut, engagement_fut);

    // 4. Fold in widened candidates, dropping any the strict pass already
    //    returned so nothing is double-scored.
    if widen {
        let seen: HashSet<Uuid> = scored.iter().map(|s| s.candidate.occurrence_id).collect();
        let fresh: Vec<TripCandidate> = relaxed_candidates
            .into_iter()
            .filter(|candidate| !seen.contains(&candidate.occurrence_id))
            .collect();

        if blend && !fresh.is_empty() {
            let fresh_ids: Vec<Uuid> = fresh.iter().map(|c| c.occurrence_id).collect();
            stats.extend(fetch_stats_absorbing(engagement, &fresh_ids, deadline).await);
        }

        scored.extend(
            fresh
                .into_iter()
                .map(|candidate| score_candidate(candidate, prefs, config, true)),
        );
    }

    // 5. Blend in popularity when the flag is on.
    if blend {
        for item in &mut scored {
            let popularity = popularity_score(
                stats.get(&item.candidate.occurrence_id),
                item.candidate.created_at,
                now,
                &config.popularity,
            );
            item.score = blend_scores(item.score, popularity, &config.popularity);
        }
    }

    // 6. Rank and page.
    scored.sort_by(rank_cmp);
    scored.truncate(limit);
    let relaxed_count = scored.iter().filter(|s| s.relaxed).count();

    tracing::info!(
        primary_count,
        relaxed_count,
        returned = scored.len(),
        widened = widen,
        processing_time_ms = started.elapsed().as_millis(),
        "Recommendation search completed"
    );

    Ok(RecommendationOutcome {
        results: assemble(scored),
        primary_count,
        relaxed_count,
        has_relaxed_results: widen,
        thresholds: config.thresholds,
    })
}

/// Runs a catalog fetch inside whatever remains of the request budget.
async fn fetch_bounded(
    catalog: &dyn CatalogStore,
    query: &CandidateQuery,
    deadline: Instant,
) -> AppResult<Vec<TripCandidate>> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        return Err(AppError::StoreUnavailable(
            "catalog fetch budget exhausted".to_string(),
        ));
    }

    match tokio::time::timeout(remaining, catalog.fetch_candidates(query)).await {
        Ok(result) => result,
        Err(_) => Err(AppError::StoreUnavailable(
            "catalog fetch timed out".to_string(),
        )),
    }
}

/// Widened-pass fetch: failures and timeouts degrade to an empty list.
async fn fetch_candidates_absorbing(
    catalog: &dyn CatalogStore,
    query: &CandidateQuery,
    deadline: Instant,
) -> Vec<TripCandidate> {
    match fetch_bounded(catalog, query, deadline).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Widened search failed, continuing with primary results only"
            );
            Vec::new()
        }
    }
}

/// Engagement lookup inside whatever remains of the request budget:
/// failures and timeouts degrade to ranking on preference alone.
async fn fetch_stats_absorbing(
    engagement: &dyn EngagementStore,
    occurrence_ids: &[Uuid],
    deadline: Instant,
) -> HashMap<Uuid, EngagementStats> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        tracing::warn!("Engagement budget exhausted, ranking on preference score alone");
        return HashMap::new();
    }

    match tokio::time::timeout(remaining, engagement.fetch_stats(occurrence_ids)).await {
        Ok(Ok(stats)) => stats,
        Ok(Err(e)) => {
            tracing::warn!(
                error = %e,
                "Engagement stats unavailable, ranking on preference score alone"
            );
            HashMap::new()
        }
        Err(_) => {
            tracing::warn!("Engagement fetch timed out, ranking on preference score alone");
            HashMap::new()
        }
    }
}
