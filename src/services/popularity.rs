use chrono::{DateTime, Utc};

use crate::{config::PopularityConfig, models::EngagementStats};

use super::scoring::MAX_SCORE;

/// Computes a 0.0 to 10.0 popularity score from engagement counters.
///
/// Occurrences without enough impressions to yield meaningful rates fall
/// into the cold-start path: recently created trips get a small fixed
/// bonus so the blend cannot bury new inventory, and everything else
/// scores zero rather than being judged on noise.
pub fn popularity_score(
    stats: Option<&EngagementStats>,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    config: &PopularityConfig,
) -> f64 {
    let observed = match stats {
        Some(stats) if stats.impressions >= config.min_impressions => stats,
        _ => {
            let age_days = (now - created_at).num_days();
            if age_days < config.new_trip_window_days {
                return config.new_trip_bonus;
            }
            return 0.0;
        }
    };

    let mut score = 0.0;

    let ctr = observed.click_through_rate();
    if let Some((_, bonus)) = config
        .ctr_bands
        .iter()
        .find(|(threshold, _)| ctr >= *threshold)
    {
        score += bonus;
    }

    let recent = observed.decayed_recent_clicks(config.stale_click_discount);
    if let Some((_, bonus)) = config
        .trending_bands
        .iter()
        .find(|(threshold, _)| recent >= *threshold)
    {
        score += bonus;
    }

    if observed.save_rate() >= config.save_rate_threshold {
        score += config.save_rate_bonus;
    }
    if observed.contact_rate() >= config.contact_rate_threshold {
        score += config.contact_rate_bonus;
    }

    score.min(config.max_score)
}

/// Blends a preference score with a popularity score.
///
/// The popularity component is rescaled to the same 0-100 range before
/// the weighted average, and the result is clamped back into range. With
/// the blend weight at zero this is the identity on the preference score.
pub fn blend_scores(preference: u32, popularity: f64, config: &PopularityConfig) -> u32 {
    let weight = config.blend_weight.clamp(0.0, 1.0);
    let blended =
        (1.0 - weight) * f64::from(preference) + weight * popularity * 10.0;
    (blended.round() as u32).min(MAX_SCORE)
}
