//! Cached rating snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The last successfully scraped rating, replaced wholesale on each scrape.
///
/// Serialized camelCase so the stored blob matches the widget's public
/// record layout (`rating`, `reviewCount`, `fetchedAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSnapshot {
    /// Star rating as shown on the listing page, nominally 0.0..=5.0.
    /// Stored as scraped; only the glyph renderer caps at five stars.
    pub rating: f64,

    /// Number of reviews behind the rating
    pub review_count: u64,

    /// When the extraction succeeded
    pub fetched_at: DateTime<Utc>,
}

impl RatingSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(rating: f64, review_count: u64) -> Self {
        Self {
            rating,
            review_count,
            fetched_at: Utc::now(),
        }
    }

    /// Default for a source that has never been scraped successfully.
    pub fn zero() -> Self {
        Self::new(0.0, 0)
    }
}
