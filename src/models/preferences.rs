use serde::{Deserialize, Serialize};

use crate::models::geo::Continent;

/// Maximum number of theme tags considered per request.
pub const MAX_THEMES: usize = 5;

/// Declarative travel preferences for one recommendation request.
///
/// Preferences are ephemeral: they arrive with the request, drive one search,
/// and are never persisted by the engine. All fields are optional; an empty
/// preference set degrades to "upcoming, bookable, no other constraints".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TravelPreferences {
    /// Explicit destination countries (ISO 3166-1 alpha-2).
    #[serde(default)]
    pub countries: Vec<String>,

    /// Destination continents, used when the traveler has a region rather
    /// than specific countries in mind.
    #[serde(default)]
    pub continents: Vec<Continent>,

    /// Preferred trip style slug (e.g. "trekking", "expedition").
    #[serde(default)]
    pub trip_style: Option<String>,

    /// Theme tags of interest, capped at [`MAX_THEMES`].
    #[serde(default)]
    pub themes: Vec<String>,

    /// Budget ceiling in cents.
    #[serde(default)]
    pub budget_cents: Option<i64>,

    #[serde(default)]
    pub duration_min_days: Option<u32>,

    #[serde(default)]
    pub duration_max_days: Option<u32>,

    /// Target difficulty level (1-5).
    #[serde(default)]
    pub difficulty: Option<u8>,

    #[serde(default)]
    pub travel_year: Option<i32>,

    /// Travel month (1-12). Without a year it resolves forward to the next
    /// occurrence of that month.
    #[serde(default)]
    pub travel_month: Option<u32>,
}

impl TravelPreferences {
    /// Returns a normalized copy of the preferences.
    ///
    /// Malformed input is corrected rather than rejected: an inverted
    /// duration range is swapped, out-of-range difficulty and month values
    /// are clamped, and a non-positive budget is dropped. Country codes are
    /// uppercased, style and themes lowercased, and all sets are deduplicated
    /// and sorted so that equal preference sets serialize identically
    /// (the cache fingerprint depends on this).
    pub fn normalized(&self) -> Self {
        let mut countries: Vec<String> = self
            .countries
            .iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        countries.sort();
        countries.dedup();

        let mut continents = self.continents.clone();
        continents.sort();
        continents.dedup();

        let trip_style = self
            .trip_style
            .as_ref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        // Keep the first MAX_THEMES distinct themes in request order, then
        // sort for a canonical representation.
        let mut themes: Vec<String> = Vec::new();
        for theme in &self.themes {
            let theme = theme.trim().to_lowercase();
            if !theme.is_empty() && !themes.contains(&theme) {
                themes.push(theme);
            }
            if themes.len() == MAX_THEMES {
                break;
            }
        }
        themes.sort();

        let budget_cents = self.budget_cents.filter(|b| *b > 0);

        let (duration_min_days, duration_max_days) =
            match (self.duration_min_days, self.duration_max_days) {
                (Some(min), Some(max)) if min > max => (Some(max), Some(min)),
                other => other,
            };

        let difficulty = self.difficulty.map(|d| d.clamp(1, 5));
        let travel_month = self.travel_month.map(|m| m.clamp(1, 12));

        Self {
            countries,
            continents,
            trip_style,
            themes,
            budget_cents,
            duration_min_days,
            duration_max_days,
            difficulty,
            travel_year: self.travel_year,
            travel_month,
        }
    }

    /// Whether any destination preference (country or continent) was given.
    pub fn has_destinations(&self) -> bool {
        !self.countries.is_empty() || !self.continents.is_empty()
    }

    /// Canonical fingerprint of these preferences plus the page size,
    /// used as the result-cache key.
    ///
    /// Only meaningful on normalized preferences: normalization sorts every
    /// set, so two requests asking for the same thing in a different order
    /// hash identically.
    pub fn fingerprint(&self, limit: usize) -> String {
        use sha2::{Digest, Sha256};

        let payload = serde_json::json!({
            "prefs": self,
            "limit": limit,
        });

        let mut hasher = Sha256::new();
        hasher.update(payload.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uppercases_and_dedupes_countries() {
        let prefs = TravelPreferences {
            countries: vec!["pe".to_string(), "PE".to_string(), " np ".to_string()],
            ..Default::default()
        };

        let normalized = prefs.normalized();
        assert_eq!(normalized.countries, vec!["NP", "PE"]);
    }

    #[test]
    fn test_normalize_lowercases_style_and_themes() {
        let prefs = TravelPreferences {
            trip_style: Some(" Trekking ".to_string()),
            themes: vec!["Wildlife".to_string(), "CULTURE".to_string()],
            ..Default::default()
        };

        let normalized = prefs.normalized();
        assert_eq!(normalized.trip_style, Some("trekking".to_string()));
        assert_eq!(normalized.themes, vec!["culture", "wildlife"]);
    }

    #[test]
    fn test_normalize_caps_themes_at_five() {
        let prefs = TravelPreferences {
            themes: (0..8).map(|i| format!("theme{}", i)).collect(),
            ..Default::default()
        };

        let normalized = prefs.normalized();
        assert_eq!(normalized.themes.len(), MAX_THEMES);
        // The first five distinct themes survive, not the last.
        assert!(normalized.themes.contains(&"theme0".to_string()));
        assert!(!normalized.themes.contains(&"theme7".to_string()));
    }

    #[test]
    fn test_normalize_swaps_inverted_duration_range() {
        let prefs = TravelPreferences {
            duration_min_days: Some(10),
            duration_max_days: Some(5),
            ..Default::default()
        };

        let normalized = prefs.normalized();
        assert_eq!(normalized.duration_min_days, Some(5));
        assert_eq!(normalized.duration_max_days, Some(10));
    }

    #[test]
    fn test_normalize_clamps_difficulty_and_month() {
        let prefs = TravelPreferences {
            difficulty: Some(9),
            travel_month: Some(14),
            ..Default::default()
        };

        let normalized = prefs.normalized();
        assert_eq!(normalized.difficulty, Some(5));
        assert_eq!(normalized.travel_month, Some(12));
    }

    #[test]
    fn test_normalize_drops_non_positive_budget() {
        let prefs = TravelPreferences {
            budget_cents: Some(-100),
            ..Default::default()
        };

        assert_eq!(prefs.normalized().budget_cents, None);
    }

    #[test]
    fn test_normalize_drops_empty_style() {
        let prefs = TravelPreferences {
            trip_style: Some("   ".to_string()),
            ..Default::default()
        };

        assert_eq!(prefs.normalized().trip_style, None);
    }

    #[test]
    fn test_fingerprint_is_order_insensitive_after_normalization() {
        let a = TravelPreferences {
            countries: vec!["PE".to_string(), "NP".to_string()],
            themes: vec!["wildlife".to_string(), "culture".to_string()],
            ..Default::default()
        }
        .normalized();

        let b = TravelPreferences {
            countries: vec!["np".to_string(), "pe".to_string()],
            themes: vec!["Culture".to_string(), "Wildlife".to_string()],
            ..Default::default()
        }
        .normalized();

        assert_eq!(a.fingerprint(10), b.fingerprint(10));
    }

    #[test]
    fn test_fingerprint_differs_by_limit() {
        let prefs = TravelPreferences::default().normalized();
        assert_ne!(prefs.fingerprint(10), prefs.fingerprint(20));
    }

    #[test]
    fn test_fingerprint_differs_by_preferences() {
        let a = TravelPreferences::default().normalized();
        let b = TravelPreferences {
            countries: vec!["PE".to_string()],
            ..Default::default()
        }
        .normalized();

        assert_ne!(a.fingerprint(10), b.fingerprint(10));
    }

    #[test]
    fn test_empty_request_deserializes() {
        let prefs: TravelPreferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs, TravelPreferences::default());
        assert!(!prefs.has_destinations());
    }
}
