//! Signal-queue seeding: latest monthly scores -> deduplicated PENDING backlog

pub mod ranking;

use crate::db::{InsertOutcome, QueueDatabase};
use crate::error::SeedError;
use crate::models::score::{date_stamp, partition_key};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of one seeding run
#[derive(Debug, Clone, Serialize)]
pub struct SeedResult {
    /// Rows actually created by this run
    pub inserted: usize,
    /// Candidates selected for insertion (inserted + already present)
    pub considered: usize,
    /// Date the run stamped into `date_queued`
    pub as_of: NaiveDate,
}

/// Materializes ranked candidates into the durable queue, exactly once per
/// (ticker, strategy, day)
pub struct QueueSeeder {
    db: Arc<QueueDatabase>,
}

impl QueueSeeder {
    pub fn new(db: Arc<QueueDatabase>) -> Self {
        Self { db }
    }

    /// Seed today's candidates for one strategy
    ///
    /// Reads the score partition for `as_of`'s month, ranks by the weighted
    /// composite (ties broken by ticker), takes the first `top_n` and
    /// inserts each as PENDING. A row that already exists for the same
    /// (ticker, strategy, day) is skipped silently; existing rows are never
    /// updated, so re-running after a partial failure or by operator error
    /// cannot revert a ticker the strategy runner already acted on.
    pub async fn seed(
        &self,
        strategy_id: i64,
        top_n: usize,
        as_of: NaiveDate,
    ) -> Result<SeedResult, SeedError> {
        if strategy_id < 0 {
            return Err(SeedError::InvalidRequest(format!(
                "strategy_id must be >= 0, got {}",
                strategy_id
            )));
        }
        if top_n == 0 {
            return Err(SeedError::InvalidRequest(
                "top_n must be > 0".to_string(),
            ));
        }

        let year_month = partition_key(as_of);
        let stamp = date_stamp(as_of);

        let records = self.db.fetch_month_scores(&year_month).await?;
        debug!(
            strategy_id,
            year_month = %year_month,
            score_rows = records.len(),
            "fetched score partition"
        );

        let candidates = ranking::select_candidates(&records, top_n);

        let mut inserted = 0;
        let mut already_present = 0;
        for candidate in &candidates {
            match self
                .db
                .insert_entry_if_absent(&candidate.ticker, strategy_id, &stamp)
                .await?
            {
                InsertOutcome::Inserted => {
                    debug!(
                        strategy_id,
                        ticker = %candidate.ticker,
                        composite = candidate.composite,
                        "queued ticker"
                    );
                    inserted += 1;
                }
                InsertOutcome::AlreadyPresent => {
                    debug!(
                        strategy_id,
                        ticker = %candidate.ticker,
                        "ticker already queued for {}", stamp
                    );
                    already_present += 1;
                }
            }
        }

        info!(
            strategy_id,
            date_queued = %stamp,
            inserted,
            already_present,
            considered = candidates.len(),
            "seeding run complete: {} inserted, {} already present",
            inserted,
            already_present
        );

        Ok(SeedResult {
            inserted,
            considered: candidates.len(),
            as_of,
        })
    }
}
