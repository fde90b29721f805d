use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::OccurrenceStatus;

use super::scoring::ScoredCandidate;

/// One ranked recommendation in the shape the API returns.
///
/// Flattens the candidate with its score and the human-readable match
/// details so clients never need a second lookup to render a result card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedTrip {
    pub occurrence_id: Uuid,
    pub template_id: Uuid,
    pub title: String,
    pub description: String,
    pub trip_style: String,
    pub primary_country: String,
    pub countries: Vec<String>,
    pub themes: Vec<String>,
    pub difficulty: u8,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub duration_days: u32,
    pub price_cents: i64,
    pub status: OccurrenceStatus,
    pub spots_left: u32,
    pub guide_name: Option<String>,
    /// Final score after any popularity blending, 0 to 100.
    pub score: u32,
    /// Why this trip was recommended, in presentation order.
    pub match_details: Vec<String>,
    /// True when the trip came from the widened search pass.
    pub relaxed: bool,
}

impl From<ScoredCandidate> for RecommendedTrip {
    fn from(scored: ScoredCandidate) -> Self {
        let candidate = scored.candidate;
        Self {
            occurrence_id: candidate.occurrence_id,
            template_id: candidate.template_id,
            title: candidate.title,
            description: candidate.description,
            trip_style: candidate.trip_style,
            primary_country: candidate.primary_country,
            countries: candidate.countries,
            themes: candidate.themes,
            difficulty: candidate.difficulty,
            start_date: candidate.start_date,
            end_date: candidate.end_date,
            duration_days: candidate.duration_days,
            price_cents: candidate.price_cents,
            status: candidate.status,
            spots_left: candidate.spots_left,
            guide_name: candidate.guide_name,
            score: scored.score,
            match_details: scored.details,
            relaxed: scored.relaxed,
        }
    }
}

/// Converts an already ranked list into the response shape, preserving
/// order.
pub fn assemble(ranked: Vec<ScoredCandidate>) -> Vec<RecommendedTrip> {
    ranked.into_iter().map(RecommendedTrip::from).collect()
}
