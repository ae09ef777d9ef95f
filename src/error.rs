//! Error taxonomies for seeding and dispatch

use thiserror::Error;

/// Failures surfaced by [`crate::seeder::QueueSeeder::seed`]
///
/// A per-row uniqueness hit is not represented here: it is the idempotency
/// guarantee and comes back as
/// [`crate::db::InsertOutcome::AlreadyPresent`] instead.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Bad seed parameters; nothing was read or written
    #[error("invalid seed request: {0}")]
    InvalidRequest(String),

    /// Storage unreachable or an unrelated SQL fault; aborts the run.
    /// Already-inserted rows are safe, re-running recovers.
    #[error("queue storage error: {0}")]
    Storage(#[from] tokio_postgres::Error),
}

/// Failures surfaced by the dispatch layer
///
/// A non-zero child exit is deliberately absent: the dispatcher reports it
/// verbatim through [`crate::dispatch::runner::ExecutionResult`] and performs
/// no retries. Supervision faults after a successful spawn are converted to
/// the sentinel exit code, not propagated.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Invalid or cross-mode settings; no process spawned, no transcript written
    #[error("invalid dispatch configuration: {0}")]
    Configuration(String),

    /// The execution target does not exist at the configured path
    #[error("execution target not found: {0}")]
    Resolution(String),

    /// The transcript file could not be created or opened before the spawn
    #[error("transcript error: {0}")]
    Transcript(#[from] std::io::Error),
}
