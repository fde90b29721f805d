pub mod engagement;
pub mod geo;
pub mod preferences;
pub mod trip;

pub use engagement::EngagementStats;
pub use geo::{continent_of, countries_in, Continent};
pub use preferences::TravelPreferences;
pub use trip::{effective_duration_days, OccurrenceStatus, TripCandidate};
