//! Durable signal-queue entries consumed by the external strategy runner

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a queue entry
///
/// Seeding only ever creates `Pending` rows. Transitions to `Entered` or
/// `Cancelled` belong to the external strategy runner, which is why the
/// seeder's insert never touches existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueueStatus {
    Pending,
    Entered,
    Cancelled,
}

impl QueueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueStatus::Pending => "PENDING",
            QueueStatus::Entered => "ENTERED",
            QueueStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(QueueStatus::Pending),
            "ENTERED" => Ok(QueueStatus::Entered),
            "CANCELLED" => Ok(QueueStatus::Cancelled),
            other => Err(format!("unknown queue status '{}'", other)),
        }
    }
}

/// One row of `signal_queue`
///
/// `last_crsi` and `last_checked` are written only by the downstream runner
/// as it observes the ticker; they are carried here for read access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalQueueEntry {
    pub id: i64,
    pub ticker: String,
    pub strategy_id: i64,
    /// Calendar date the entry was seeded, `YYYY-MM-DD`
    pub date_queued: String,
    pub status: QueueStatus,
    pub last_crsi: Option<f64>,
    pub last_checked: Option<String>,
}
