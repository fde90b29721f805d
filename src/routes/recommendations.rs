use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::{
    cached,
    db::CacheKey,
    error::AppResult,
    middleware::request_id::RequestId,
    models::TravelPreferences,
    routes::AppState,
    services::recommendations::{self, RecommendationOutcome},
};

/// Cached outcomes expire after five minutes. Inventory and engagement
/// both move slowly enough for that to stay honest.
const RECOMMENDATIONS_TTL_SECS: u64 = 300;

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub preferences: TravelPreferences,
    /// Page size; clamped server-side, defaulted when absent.
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub outcome: RecommendationOutcome,
    /// Echo of the request's correlation id, for support tickets.
    pub correlation_id: String,
}

/// Handler for the recommendations endpoint.
///
/// Preferences are normalized before anything else so equivalent requests
/// share one cache entry and one deterministic result.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let prefs = request.preferences.normalized();
    let limit = request
        .limit
        .unwrap_or(state.engine.search.default_page_size)
        .clamp(1, state.engine.search.max_page_size);

    tracing::info!(
        request_id = %request_id,
        countries = prefs.countries.len(),
        themes = prefs.themes.len(),
        limit,
        "Processing recommendation request"
    );

    let cache_key = CacheKey::Recommendations(prefs.fingerprint(limit));
    let outcome: RecommendationOutcome =
        cached!(state.cache, cache_key, RECOMMENDATIONS_TTL_SECS, async {
            recommendations::recommend_trips(
                state.catalog.as_ref(),
                state.engagement.as_ref(),
                &prefs,
                limit,
                chrono::Utc::now(),
                &state.engine,
            )
            .await
        })?;

    tracing::info!(
        request_id = %request_id,
        results = outcome.results.len(),
        widened = outcome.has_relaxed_results,
        "Recommendation request completed"
    );

    Ok(Json(RecommendationResponse {
        outcome,
        correlation_id: request_id.as_str().to_string(),
    }))
}
