//! Postgres storage for scores and the signal queue

pub mod queue;

pub use queue::{InsertOutcome, QueueDatabase};
