//! Database operations for the score input and the durable signal queue

use crate::models::queue::{QueueStatus, SignalQueueEntry};
use crate::models::score::ScoreRecord;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls};

/// Result of a single idempotent queue insert
///
/// `AlreadyPresent` is the idempotency guarantee, not a failure: the row for
/// this (ticker, strategy, day) exists and its state was left untouched.
/// Unrelated storage faults are never folded into this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
}

pub struct QueueDatabase {
    client: Client,
}

impl QueueDatabase {
    /// Connect and ensure the schema exists
    ///
    /// Table creation is idempotent (`CREATE TABLE IF NOT EXISTS`), so
    /// repeated startups and concurrent seeders are safe.
    pub async fn connect(database_url: &str) -> Result<Self, tokio_postgres::Error> {
        let (client, connection) = tokio_postgres::connect(database_url, NoTls).await?;

        // Drive the connection on its own task for the life of the client.
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "database connection error");
            }
        });

        let db = Self { client };
        db.init_schema().await?;

        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), tokio_postgres::Error> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS signal_queue (
                    id            BIGSERIAL PRIMARY KEY,
                    ticker        TEXT NOT NULL,
                    strategy_id   BIGINT NOT NULL,
                    date_queued   TEXT NOT NULL,
                    status        TEXT NOT NULL DEFAULT 'PENDING'
                                  CHECK (status IN ('PENDING','ENTERED','CANCELLED')),
                    last_crsi     DOUBLE PRECISION,
                    last_checked  TEXT,
                    UNIQUE (ticker, strategy_id, date_queued)
                )",
                &[],
            )
            .await?;

        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS scores (
                    id                  BIGSERIAL PRIMARY KEY,
                    ticker              TEXT NOT NULL,
                    year_month          TEXT NOT NULL,
                    analyst_avg_score   DOUBLE PRECISION,
                    price_target_score  DOUBLE PRECISION,
                    date                TEXT,
                    UNIQUE (ticker, year_month)
                )",
                &[],
            )
            .await?;

        Ok(())
    }

    /// Fetch every score row for one monthly partition
    ///
    /// Unscored rows (either score NULL) are returned as-is; ranking decides
    /// what to exclude. Ordering is not relied upon here.
    pub async fn fetch_month_scores(
        &self,
        year_month: &str,
    ) -> Result<Vec<ScoreRecord>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT ticker, year_month, analyst_avg_score, price_target_score
                 FROM scores
                 WHERE year_month = $1",
                &[&year_month],
            )
            .await?;

        let records = rows
            .iter()
            .map(|row| ScoreRecord {
                ticker: row.get(0),
                year_month: row.get(1),
                analyst_avg_score: row.get(2),
                price_target_score: row.get(3),
            })
            .collect();

        Ok(records)
    }

    /// Insert a PENDING queue row unless the (ticker, strategy, day) triplet
    /// already exists
    ///
    /// `ON CONFLICT DO NOTHING` makes the insert race-free: concurrent
    /// seeders converge to one row per triplet without application locking,
    /// and an existing row's status/last_crsi/last_checked are never
    /// disturbed. A uniqueness violation surfacing as an error (e.g. through
    /// a partial unique index) is mapped to `AlreadyPresent` as well; every
    /// other storage fault propagates.
    pub async fn insert_entry_if_absent(
        &self,
        ticker: &str,
        strategy_id: i64,
        date_queued: &str,
    ) -> Result<InsertOutcome, tokio_postgres::Error> {
        let result = self
            .client
            .execute(
                "INSERT INTO signal_queue (ticker, strategy_id, date_queued, status)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (ticker, strategy_id, date_queued) DO NOTHING",
                &[
                    &ticker,
                    &strategy_id,
                    &date_queued,
                    &QueueStatus::Pending.as_str(),
                ],
            )
            .await;

        match result {
            Ok(0) => Ok(InsertOutcome::AlreadyPresent),
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => {
                Ok(InsertOutcome::AlreadyPresent)
            }
            Err(e) => Err(e),
        }
    }

    /// Producer-side upsert of one monthly score row, keyed on
    /// (ticker, year_month)
    pub async fn upsert_score(&self, record: &ScoreRecord) -> Result<(), tokio_postgres::Error> {
        self.client
            .execute(
                "INSERT INTO scores (ticker, year_month, analyst_avg_score, price_target_score)
                 VALUES ($1, $2, $3, $4)
                 ON CONFLICT (ticker, year_month) DO UPDATE
                 SET analyst_avg_score = EXCLUDED.analyst_avg_score,
                     price_target_score = EXCLUDED.price_target_score",
                &[
                    &record.ticker,
                    &record.year_month,
                    &record.analyst_avg_score,
                    &record.price_target_score,
                ],
            )
            .await?;

        Ok(())
    }

    /// Read back the queue rows for one strategy and day, newest id first
    pub async fn fetch_queue_entries(
        &self,
        strategy_id: i64,
        date_queued: &str,
    ) -> Result<Vec<SignalQueueEntry>, tokio_postgres::Error> {
        let rows = self
            .client
            .query(
                "SELECT id, ticker, strategy_id, date_queued, status, last_crsi, last_checked
                 FROM signal_queue
                 WHERE strategy_id = $1 AND date_queued = $2
                 ORDER BY id DESC",
                &[&strategy_id, &date_queued],
            )
            .await?;

        let entries = rows
            .iter()
            .map(|row| {
                let status_str: String = row.get(4);
                // The CHECK constraint keeps this total; fall back to PENDING
                // rather than failing a read on a value we cannot represent.
                let status = status_str.parse().unwrap_or(QueueStatus::Pending);

                SignalQueueEntry {
                    id: row.get(0),
                    ticker: row.get(1),
                    strategy_id: row.get(2),
                    date_queued: row.get(3),
                    status,
                    last_crsi: row.get(5),
                    last_checked: row.get(6),
                }
            })
            .collect();

        Ok(entries)
    }

    /// Raw statement access for test fixtures and one-off maintenance
    pub async fn execute_raw(
        &self,
        statement: &str,
    ) -> Result<u64, tokio_postgres::Error> {
        self.client.execute(statement, &[]).await
    }
}
