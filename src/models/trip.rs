use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a scheduled trip occurrence.
///
/// Transitions are driven by the external booking system; the engine
/// only ever reads the current state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceStatus {
    Open,
    Guaranteed,
    LastPlaces,
    Full,
    Cancelled,
}

impl OccurrenceStatus {
    /// Parses the catalog's textual status column.
    ///
    /// Returns `None` for unknown values so callers can drop rows they
    /// cannot reason about instead of guessing at bookability.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(OccurrenceStatus::Open),
            "guaranteed" => Some(OccurrenceStatus::Guaranteed),
            "last_places" => Some(OccurrenceStatus::LastPlaces),
            "full" => Some(OccurrenceStatus::Full),
            "cancelled" => Some(OccurrenceStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether the occurrence can still be booked.
    pub fn is_bookable(&self) -> bool {
        !matches!(self, OccurrenceStatus::Full | OccurrenceStatus::Cancelled)
    }
}

/// A trip occurrence joined with its template, with derived fields
/// resolved once during candidate assembly.
///
/// This is the engine's single canonical representation of a catalog row;
/// everything downstream (scoring, blending, assembly) reads these fields
/// and nothing re-derives them. Exists only for the duration of one
/// recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripCandidate {
    pub occurrence_id: Uuid,
    pub template_id: Uuid,
    pub title: String,
    pub description: String,
    pub trip_style: String,
    pub primary_country: String,
    /// Countries the itinerary covers (alpha-2 codes, uppercase).
    pub countries: Vec<String>,
    /// Theme tags on the template (lowercase slugs).
    pub themes: Vec<String>,
    pub difficulty: u8,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Effective duration: inclusive day span of the occurrence dates, or
    /// the template's typical duration when the end date is absent.
    pub duration_days: u32,
    /// Effective price: occurrence override, or the template base price.
    pub price_cents: i64,
    pub status: OccurrenceStatus,
    pub spots_left: u32,
    pub guide_name: Option<String>,
    /// When the occurrence was scheduled; used for cold-start recency.
    pub created_at: DateTime<Utc>,
}

/// Resolves the effective duration of an occurrence in whole days.
///
/// Trips are quoted inclusively (Mar 1 through Mar 7 is a 7-day trip). An absent
/// or inconsistent end date falls back to the template's typical duration.
pub fn effective_duration_days(
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    typical_duration_days: u32,
) -> u32 {
    match end_date {
        Some(end) if end >= start_date => {
            (end.signed_duration_since(start_date).num_days() + 1) as u32
        }
        _ => typical_duration_days,
    }
}
