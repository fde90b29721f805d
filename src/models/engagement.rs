use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rolling engagement metrics for one trip occurrence.
///
/// Aggregated upstream by the analytics pipeline; the engine only reads
/// them. A missing row means "no data yet", not "unpopular": new
/// inventory simply has no sample to score from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct EngagementStats {
    pub occurrence_id: Uuid,
    /// Times the occurrence was shown in any result list.
    pub impressions: i64,
    /// All-time clicks.
    pub clicks: i64,
    /// Clicks in the trailing 7 days.
    pub clicks_7d: i64,
    /// Clicks in the trailing 30 days (includes the 7-day window).
    pub clicks_30d: i64,
    pub saves: i64,
    pub contacts: i64,
}

impl EngagementStats {
    /// Click-through rate, 0.0 when there are no impressions.
    pub fn click_through_rate(&self) -> f64 {
        rate(self.clicks, self.impressions)
    }

    pub fn save_rate(&self) -> f64 {
        rate(self.saves, self.impressions)
    }

    pub fn contact_rate(&self) -> f64 {
        rate(self.contacts, self.impressions)
    }

    /// Recent clicks with older activity discounted.
    ///
    /// Clicks aged 8-30 days count at `stale_discount` relative to clicks
    /// in the last 7 days, so an occurrence that is still being clicked
    /// outranks one whose spike has passed.
    pub fn decayed_recent_clicks(&self, stale_discount: f64) -> f64 {
        let stale = (self.clicks_30d - self.clicks_7d).max(0);
        self.clicks_7d as f64 + stale_discount * stale as f64
    }
}

fn rate(events: i64, impressions: i64) -> f64 {
    if impressions <= 0 {
        return 0.0;
    }
    events as f64 / impressions as f64
}
