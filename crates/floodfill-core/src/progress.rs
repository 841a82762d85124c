//! Run counters and progress reporting.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Counters describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillSummary {
    /// Nodes enqueued, seeds included, duplicates included.
    pub discovered: u64,
    /// Claims won; each of these nodes was visited exactly once.
    pub visited: u64,
    /// Claims lost to an earlier discovery of the same identity.
    pub duplicates: u64,
    /// Claimed nodes whose visit or neighbor listing failed.
    pub failed: u64,
    /// Wall time of the run.
    pub elapsed: Duration,
}

impl FillSummary {
    /// Claimed nodes that completed without failure.
    pub fn succeeded(&self) -> u64 {
        self.visited.saturating_sub(self.failed)
    }
}

/// Progress information during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillProgress {
    /// Nodes enqueued so far.
    pub discovered: u64,
    /// Claims won so far.
    pub visited: u64,
    /// Claims lost so far.
    pub duplicates: u64,
    /// Failures recorded so far.
    pub failed: u64,
    /// Time elapsed since the run started.
    pub elapsed: Duration,
}

impl FillProgress {
    /// Nodes enqueued but not yet claimed or rejected.
    pub fn pending(&self) -> u64 {
        self.discovered
            .saturating_sub(self.visited)
            .saturating_sub(self.duplicates)
    }

    /// Claims won per second.
    pub fn visits_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.visited as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl From<FillProgress> for FillSummary {
    fn from(progress: FillProgress) -> Self {
        Self {
            discovered: progress.discovered,
            visited: progress.visited,
            duplicates: progress.duplicates,
            failed: progress.failed,
            elapsed: progress.elapsed,
        }
    }
}
