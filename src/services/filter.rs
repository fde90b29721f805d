use chrono::{Datelike, Months, NaiveDate};

use crate::{
    config::SearchConfig,
    models::{continent_of, countries_in, TravelPreferences},
};

/// Strictness of a candidate search pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Filter on the traveler's exact stated preferences.
    Primary,
    /// Loosened predicates used when the primary pass is under-supplied:
    /// wider window, wider difficulty tolerance, continent neighbors
    /// admitted, trip style ignored.
    Relaxed,
}

/// Declarative predicate set for one candidate fetch.
///
/// Built once per pass from the normalized preferences and executed by a
/// `CatalogStore`. Empty `countries` and `None` fields mean "no predicate";
/// an empty preference set degrades to upcoming bookable occurrences with
/// no other constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub mode: SearchMode,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// Effective destination set; matches any overlap with a template's
    /// covered countries.
    pub countries: Vec<String>,
    pub trip_style: Option<String>,
    pub difficulty_min: Option<u8>,
    pub difficulty_max: Option<u8>,
    /// Admission ceiling: budget times the stretch multiplier. Budget
    /// tightness itself is a scoring concern.
    pub max_price_cents: Option<i64>,
    /// Candidate cap; the store must apply it after ordering by
    /// (start date, occurrence id) so truncation is reproducible.
    pub limit: i64,
}

impl CandidateQuery {
    /// Builds the predicate set for one pass.
    pub fn build(
        prefs: &TravelPreferences,
        mode: SearchMode,
        today: NaiveDate,
        config: &SearchConfig,
    ) -> Self {
        let (window_start, window_end) = travel_window(prefs, mode, today, config);

        let trip_style = match mode {
            SearchMode::Primary => prefs.trip_style.clone(),
            SearchMode::Relaxed => None,
        };

        let (difficulty_min, difficulty_max) = match (prefs.difficulty, mode) {
            (None, _) => (None, None),
            (Some(level), SearchMode::Primary) => (Some(level), Some(level)),
            (Some(level), SearchMode::Relaxed) => {
                let tolerance = config.relaxed_difficulty_tolerance;
                (
                    Some(level.saturating_sub(tolerance).max(1)),
                    Some(level.saturating_add(tolerance).min(5)),
                )
            }
        };

        let max_price_cents = prefs
            .budget_cents
            .map(|budget| (budget as f64 * config.budget_stretch_multiplier).round() as i64);

        Self {
            mode,
            window_start,
            window_end,
            countries: effective_country_set(prefs, mode),
            trip_style,
            difficulty_min,
            difficulty_max,
            max_price_cents,
            limit: config.candidate_cap,
        }
    }
}

/// Resolves the start-date window for a pass.
///
/// Primary: the exact month when year and month are both given, the whole
/// year for a bare year, the next occurrence of a bare month, otherwise
/// today plus the default window. Relaxed pads the primary window by the
/// configured number of months on each side. The start never precedes
/// today; a window entirely in the past simply matches nothing.
fn travel_window(
    prefs: &TravelPreferences,
    mode: SearchMode,
    today: NaiveDate,
    config: &SearchConfig,
) -> (NaiveDate, NaiveDate) {
    let (mut start, mut end) = match (prefs.travel_year, prefs.travel_month) {
        (Some(year), Some(month)) => (
            month_start(year, month).unwrap_or(today),
            month_end(year, month).unwrap_or(today),
        ),
        (Some(year), None) => (
            month_start(year, 1).unwrap_or(today),
            month_end(year, 12).unwrap_or(today),
        ),
        (None, Some(month)) => {
            let year = if month >= today.month() {
                today.year()
            } else {
                today.year() + 1
            };
            (
                month_start(year, month).unwrap_or(today),
                month_end(year, month).unwrap_or(today),
            )
        }
        (None, None) => (today, add_months(today, config.default_window_months)),
    };

    if mode == SearchMode::Relaxed {
        let pad = config.relaxed_window_pad_months;
        start = start
            .checked_sub_months(Months::new(pad))
            .unwrap_or(NaiveDate::MIN);
        end = add_months(end, pad);
    }

    (start.max(today), end)
}

/// Expands the destination preferences into the effective country set.
///
/// Explicit countries are unioned with every country of each requested
/// continent. In relaxed mode, countries sharing a continent with any
/// explicitly requested country join the set as well, so a traveler who
/// asked for Peru can be offered Bolivia when Peru is sold out. Empty
/// output means no destination predicate at all.
pub fn effective_country_set(prefs: &TravelPreferences, mode: SearchMode) -> Vec<String> {
    let mut set: Vec<String> = prefs.countries.clone();

    for continent in &prefs.continents {
        set.extend(countries_in(*continent).map(str::to_string));
    }

    if mode == SearchMode::Relaxed {
        for country in &prefs.countries {
            if let Some(continent) = continent_of(country) {
                set.extend(countries_in(continent).map(str::to_string));
            }
        }
    }

    set.sort();
    set.dedup();
    set
}

fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Continent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 8, 24)
    }

    #[test]
    fn test_window_exact_month() {
        let prefs = TravelPreferences {
            travel_year: Some(2027),
            travel_month: Some(3),
            ..Default::default()
        };

        let query = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &SearchConfig::default());
        assert_eq!(query.window_start, date(2027, 3, 1));
        assert_eq!(query.window_end, date(2027, 3, 31));
    }

    #[test]
    fn test_window_whole_year_clamped_to_today() {
        let prefs = TravelPreferences {
            travel_year: Some(2026),
            ..Default::default()
        };

        let query = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &SearchConfig::default());
        // January-August of the requested year are already gone.
        assert_eq!(query.window_start, today());
        assert_eq!(query.window_end, date(2026, 12, 31));
    }

    #[test]
    fn test_window_bare_month_resolves_forward() {
        let config = SearchConfig::default();

        // March has passed this year, so it means next March.
        let march = TravelPreferences {
            travel_month: Some(3),
            ..Default::default()
        };
        let query = CandidateQuery::build(&march, SearchMode::Primary, today(), &config);
        assert_eq!(query.window_start, date(2027, 3, 1));
        assert_eq!(query.window_end, date(2027, 3, 31));

        // The current month still means this year, from today onward.
        let august = TravelPreferences {
            travel_month: Some(8),
            ..Default::default()
        };
        let query = CandidateQuery::build(&august, SearchMode::Primary, today(), &config);
        assert_eq!(query.window_start, today());
        assert_eq!(query.window_end, date(2026, 8, 31));
    }

    #[test]
    fn test_window_defaults_to_a_year_ahead() {
        let prefs = TravelPreferences::default();
        let query = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &SearchConfig::default());
        assert_eq!(query.window_start, today());
        assert_eq!(query.window_end, date(2027, 8, 24));
    }

    #[test]
    fn test_relaxed_window_pads_both_sides() {
        let prefs = TravelPreferences {
            travel_year: Some(2027),
            travel_month: Some(3),
            ..Default::default()
        };

        let query = CandidateQuery::build(&prefs, SearchMode::Relaxed, today(), &SearchConfig::default());
        assert_eq!(query.window_start, date(2027, 1, 1));
        assert_eq!(query.window_end, date(2027, 5, 31));
    }

    #[test]
    fn test_relaxed_window_start_never_precedes_today() {
        let prefs = TravelPreferences {
            travel_year: Some(2026),
            travel_month: Some(9),
            ..Default::default()
        };

        let query = CandidateQuery::build(&prefs, SearchMode::Relaxed, today(), &SearchConfig::default());
        // Padding would reach back to July; the past stays excluded.
        assert_eq!(query.window_start, today());
        assert_eq!(query.window_end, date(2026, 11, 30));
    }

    #[test]
    fn test_relaxed_window_contains_primary_window() {
        let prefs = TravelPreferences {
            travel_year: Some(2027),
            travel_month: Some(1),
            ..Default::default()
        };
        let config = SearchConfig::default();

        let primary = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &config);
        let relaxed = CandidateQuery::build(&prefs, SearchMode::Relaxed, today(), &config);
        assert!(relaxed.window_start <= primary.window_start);
        assert!(relaxed.window_end >= primary.window_end);
    }

    #[test]
    fn test_country_set_unions_continents() {
        let prefs = TravelPreferences {
            countries: vec!["JP".to_string()],
            continents: vec![Continent::SouthAmerica],
            ..Default::default()
        };

        let set = effective_country_set(&prefs, SearchMode::Primary);
        assert!(set.contains(&"JP".to_string()));
        assert!(set.contains(&"PE".to_string()));
        assert!(set.contains(&"AR".to_string()));
        assert!(!set.contains(&"IT".to_string()));
    }

    #[test]
    fn test_relaxed_country_set_adds_continent_neighbors() {
        let prefs = TravelPreferences {
            countries: vec!["PE".to_string()],
            ..Default::default()
        };

        let primary = effective_country_set(&prefs, SearchMode::Primary);
        assert_eq!(primary, vec!["PE"]);

        let relaxed = effective_country_set(&prefs, SearchMode::Relaxed);
        assert!(relaxed.contains(&"PE".to_string()));
        assert!(relaxed.contains(&"BO".to_string()));
        assert!(!relaxed.contains(&"NP".to_string()));
    }

    #[test]
    fn test_unknown_country_code_survives_but_adds_no_neighbors() {
        let prefs = TravelPreferences {
            countries: vec!["XX".to_string()],
            ..Default::default()
        };

        let relaxed = effective_country_set(&prefs, SearchMode::Relaxed);
        assert_eq!(relaxed, vec!["XX"]);
    }

    #[test]
    fn test_empty_preferences_degrade_to_no_constraints() {
        let prefs = TravelPreferences::default();
        let query = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &SearchConfig::default());

        assert!(query.countries.is_empty());
        assert_eq!(query.trip_style, None);
        assert_eq!(query.difficulty_min, None);
        assert_eq!(query.difficulty_max, None);
        assert_eq!(query.max_price_cents, None);
        assert_eq!(query.limit, 200);
    }

    #[test]
    fn test_style_ignored_in_relaxed_mode() {
        let prefs = TravelPreferences {
            trip_style: Some("trekking".to_string()),
            ..Default::default()
        };
        let config = SearchConfig::default();

        let primary = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &config);
        assert_eq!(primary.trip_style, Some("trekking".to_string()));

        let relaxed = CandidateQuery::build(&prefs, SearchMode::Relaxed, today(), &config);
        assert_eq!(relaxed.trip_style, None);
    }

    #[test]
    fn test_difficulty_exact_in_primary_tolerant_in_relaxed() {
        let prefs = TravelPreferences {
            difficulty: Some(4),
            ..Default::default()
        };
        let config = SearchConfig::default();

        let primary = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &config);
        assert_eq!(primary.difficulty_min, Some(4));
        assert_eq!(primary.difficulty_max, Some(4));

        let relaxed = CandidateQuery::build(&prefs, SearchMode::Relaxed, today(), &config);
        assert_eq!(relaxed.difficulty_min, Some(2));
        // Clamped to the top of the scale.
        assert_eq!(relaxed.difficulty_max, Some(5));
    }

    #[test]
    fn test_price_ceiling_allows_stretch_in_both_modes() {
        let prefs = TravelPreferences {
            budget_cents: Some(100_000),
            ..Default::default()
        };
        let config = SearchConfig::default();

        let primary = CandidateQuery::build(&prefs, SearchMode::Primary, today(), &config);
        let relaxed = CandidateQuery::build(&prefs, SearchMode::Relaxed, today(), &config);
        assert_eq!(primary.max_price_cents, Some(150_000));
        assert_eq!(relaxed.max_price_cents, Some(150_000));
    }
}
