//! Monthly instrument scores produced by the external scoring step

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weight of the analyst-recommendation score in the composite
pub const ANALYST_WEIGHT: f64 = 0.6;
/// Weight of the price-target score in the composite
pub const PRICE_TARGET_WEIGHT: f64 = 0.4;

/// One score row per ticker per month, keyed by (`ticker`, `year_month`)
///
/// Both scores are nullable: the producer skips tickers it could not score,
/// and those rows never enter the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub ticker: String,
    pub year_month: String,
    pub analyst_avg_score: Option<f64>,
    pub price_target_score: Option<f64>,
}

impl ScoreRecord {
    /// Weighted composite used to rank candidates, `None` if either input
    /// score is absent or non-finite
    pub fn composite(&self) -> Option<f64> {
        let analyst = self.analyst_avg_score?;
        let price_target = self.price_target_score?;
        let composite = ANALYST_WEIGHT * analyst + PRICE_TARGET_WEIGHT * price_target;
        composite.is_finite().then_some(composite)
    }
}

/// Monthly partition key, e.g. `2024_06`
pub fn partition_key(date: NaiveDate) -> String {
    date.format("%Y_%m").to_string()
}

/// Calendar-date stamp written to `date_queued`, e.g. `2024-06-01`
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
