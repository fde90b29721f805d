use std::cmp::Ordering;

use crate::{
    config::EngineConfig,
    models::{continent_of, OccurrenceStatus, TravelPreferences, TripCandidate},
};

/// Upper bound on any preference score.
pub const MAX_SCORE: u32 = 100;

/// Detail line injected ahead of all others on relaxed-pass candidates so
/// the caller can visually distinguish them.
pub const RELAXED_MATCH_NOTE: &str = "Included by widening your search";

/// A candidate annotated with its preference score and the reasons behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: TripCandidate,
    pub score: u32,
    /// Human-readable contributions in a fixed order; only criteria that
    /// actually contributed emit a line.
    pub details: Vec<String>,
    /// Whether this candidate came from the relaxed pass.
    pub relaxed: bool,
}

/// Scores one filtered candidate against the traveler's preferences.
///
/// An additive point system: a base award for passing the filter, then an
/// independent bonus per matching criterion, capped at [`MAX_SCORE`]. No
/// criterion ever subtracts, so adding a matching criterion to an otherwise
/// identical candidate never lowers its score. Deterministic: the same
/// candidate and preferences always produce the same score and the same
/// detail ordering.
pub fn score_candidate(
    candidate: TripCandidate,
    prefs: &TravelPreferences,
    config: &EngineConfig,
    relaxed: bool,
) -> ScoredCandidate {
    let weights = &config.weights;
    let mut score = weights.base;
    let mut details = Vec::new();

    if relaxed {
        details.push(RELAXED_MATCH_NOTE.to_string());
    }
    details.push("Departs in your travel window".to_string());

    if let Some((bonus, detail)) = theme_bonus(&candidate, prefs, config) {
        score += bonus;
        details.push(detail);
    }
    if let Some((bonus, detail)) = difficulty_bonus(&candidate, prefs, config) {
        score += bonus;
        details.push(detail);
    }
    if let Some((bonus, detail)) = duration_bonus(&candidate, prefs, config) {
        score += bonus;
        details.push(detail);
    }
    if let Some((bonus, detail)) = budget_bonus(&candidate, prefs, config) {
        score += bonus;
        details.push(detail);
    }
    if let Some((bonus, detail)) = status_bonus(&candidate, config) {
        score += bonus;
        details.push(detail);
    }
    if let Some((bonus, detail)) = geography_bonus(&candidate, prefs, config) {
        score += bonus;
        details.push(detail);
    }

    ScoredCandidate {
        candidate,
        score: score.min(MAX_SCORE),
        details,
        relaxed,
    }
}

/// Total ranking order over scored candidates.
///
/// Higher score first; ties break on earlier start date, then lower
/// effective price, then occurrence id, so equal-score candidates never
/// end up in an arbitrary order.
pub fn rank_cmp(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.candidate.start_date.cmp(&b.candidate.start_date))
        .then_with(|| a.candidate.price_cents.cmp(&b.candidate.price_cents))
        .then_with(|| a.candidate.occurrence_id.cmp(&b.candidate.occurrence_id))
}

fn theme_bonus(
    candidate: &TripCandidate,
    prefs: &TravelPreferences,
    config: &EngineConfig,
) -> Option<(u32, String)> {
    if prefs.themes.is_empty() {
        return None;
    }

    let matched: Vec<&str> = prefs
        .themes
        .iter()
        .filter(|theme| candidate.themes.iter().any(|t| t == *theme))
        .map(String::as_str)
        .collect();

    if matched.is_empty() {
        return None;
    }

    if matched.len() == prefs.themes.len() {
        Some((
            config.weights.all_themes,
            format!("Covers all your interests: {}", matched.join(", ")),
        ))
    } else {
        Some((
            config.weights.some_themes,
            format!(
                "Covers {} of your {} interests",
                matched.len(),
                prefs.themes.len()
            ),
        ))
    }
}

fn difficulty_bonus(
    candidate: &TripCandidate,
    prefs: &TravelPreferences,
    config: &EngineConfig,
) -> Option<(u32, String)> {
    let target = prefs.difficulty?;
    let distance = candidate.difficulty.abs_diff(target);

    match distance {
        0 => Some((
            config.weights.difficulty_exact,
            format!("Difficulty {} matches your preference", candidate.difficulty),
        )),
        1 => Some((
            config.weights.difficulty_adjacent,
            format!(
                "Difficulty {} is one level from your preference",
                candidate.difficulty
            ),
        )),
        _ => None,
    }
}

fn duration_bonus(
    candidate: &TripCandidate,
    prefs: &TravelPreferences,
    config: &EngineConfig,
) -> Option<(u32, String)> {
    if prefs.duration_min_days.is_none() && prefs.duration_max_days.is_none() {
        return None;
    }

    let lo = prefs.duration_min_days.unwrap_or(0);
    let hi = prefs.duration_max_days.unwrap_or(u32::MAX);
    let days = candidate.duration_days;

    if (lo..=hi).contains(&days) {
        return Some((
            config.weights.duration_in_range,
            format!("{}-day duration fits your preferred length", days),
        ));
    }

    // Near-misses fade out with distance from the range edge.
    let distance = if days < lo { lo - days } else { days - hi };
    let bonus = config
        .weights
        .duration_in_range
        .saturating_sub(config.weights.duration_near_step.saturating_mul(distance));

    if bonus == 0 {
        return None;
    }

    Some((
        bonus,
        format!("{}-day duration is close to your preferred length", days),
    ))
}

fn budget_bonus(
    candidate: &TripCandidate,
    prefs: &TravelPreferences,
    config: &EngineConfig,
) -> Option<(u32, String)> {
    let budget = prefs.budget_cents?;

    if candidate.price_cents <= budget {
        return Some((
            config.weights.budget_within,
            "Priced within your budget".to_string(),
        ));
    }

    let stretch_ceiling = (budget as f64 * config.search.budget_stretch_multiplier).round() as i64;
    if candidate.price_cents <= stretch_ceiling {
        return Some((
            config.weights.budget_stretch,
            "Slightly above your budget".to_string(),
        ));
    }

    None
}

fn status_bonus(candidate: &TripCandidate, config: &EngineConfig) -> Option<(u32, String)> {
    match candidate.status {
        OccurrenceStatus::LastPlaces => Some((
            config.weights.status_last_places,
            "Only a few places left".to_string(),
        )),
        OccurrenceStatus::Guaranteed => Some((
            config.weights.status_guaranteed,
            "Guaranteed departure".to_string(),
        )),
        _ => None,
    }
}

fn geography_bonus(
    candidate: &TripCandidate,
    prefs: &TravelPreferences,
    config: &EngineConfig,
) -> Option<(u32, String)> {
    if !prefs.has_destinations() {
        return None;
    }

    let mut direct: Vec<&str> = prefs
        .countries
        .iter()
        .filter(|country| candidate.countries.iter().any(|c| c == *country))
        .map(String::as_str)
        .collect();

    if !direct.is_empty() {
        direct.sort();
        return Some((
            config.weights.country_match,
            format!("Visits {}", direct.join(", ")),
        ));
    }

    // Continent-level match: either a requested continent, or the continent
    // of an explicitly requested country (how relaxed-pass neighbors score).
    let candidate_continents: Vec<_> = candidate
        .countries
        .iter()
        .filter_map(|c| continent_of(c))
        .collect();

    let continent_hit = candidate_continents
        .iter()
        .any(|continent| prefs.continents.contains(continent))
        || prefs
            .countries
            .iter()
            .filter_map(|c| continent_of(c))
            .any(|continent| candidate_continents.contains(&continent));

    if continent_hit {
        return Some((
            config.weights.continent_match,
            "In your preferred part of the world".to_string(),
        ));
    }

    None
}
