//! Top-N candidate selection over a monthly score partition

use crate::models::score::ScoreRecord;
use std::cmp::Ordering;

/// A ticker selected for seeding, with the composite that ranked it
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub ticker: String,
    pub composite: f64,
}

/// Rank records by composite score descending and take the first `top_n`
///
/// Records missing either score are excluded before ranking. Equal
/// composites are broken by ticker lexical order, so the selection is
/// deterministic and reproducible regardless of storage row order.
pub fn select_candidates(records: &[ScoreRecord], top_n: usize) -> Vec<Candidate> {
    let mut scored: Vec<Candidate> = records
        .iter()
        .filter_map(|record| {
            record.composite().map(|composite| Candidate {
                ticker: record.ticker.clone(),
                composite,
            })
        })
        .collect();

    scored.sort_by(|a, b| {
        b.composite
            .partial_cmp(&a.composite)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    scored.truncate(top_n);
    scored
}
