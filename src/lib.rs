//! signalq - daily trading-signal queue pipeline
//!
//! Two independently scheduled components composed only through shared
//! Postgres state and a process boundary:
//!
//! - [`seeder`]: ranks the latest monthly instrument scores and materializes
//!   the top candidates into the durable `signal_queue` table, exactly once
//!   per (ticker, strategy, day).
//! - [`dispatch`]: validates an operating-mode configuration, launches the
//!   external execution target once, mirrors its output to a per-invocation
//!   transcript and propagates its exit code.

pub mod config;
pub mod db;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod models;
pub mod seeder;
