//! Shared data models spanning the pipeline layers.

pub mod queue;
pub mod score;

pub use queue::{QueueStatus, SignalQueueEntry};
pub use score::{ScoreRecord, ANALYST_WEIGHT, PRICE_TARGET_WEIGHT};
