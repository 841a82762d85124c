//! Collects per-node failures into one outcome.

use std::sync::{Mutex, MutexGuard, PoisonError};

use floodfill_core::{FillSummary, FloodfillError, Node, VisitFailure};
use tracing::warn;

/// Thread-safe collector of [`VisitFailure`]s for one run.
#[derive(Debug)]
pub struct ErrorAggregator<N: Node> {
    failures: Mutex<Vec<VisitFailure<N>>>,
}

impl<N: Node> ErrorAggregator<N> {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Record a failed node.
    pub fn record(&self, failure: VisitFailure<N>) {
        warn!(id = ?failure.id, stage = %failure.stage, cause = %failure.cause, "node failed");
        self.lock().push(failure);
    }

    /// Number of failures recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing failed so far.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take every recorded failure and build the run outcome.
    ///
    /// Called once, after all tasks have completed.
    pub fn finish(&self, summary: FillSummary) -> Result<FillSummary, FloodfillError<N>> {
        let failures = std::mem::take(&mut *self.lock());
        FloodfillError::check(failures, summary)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<VisitFailure<N>>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<N: Node> Default for ErrorAggregator<N> {
    fn default() -> Self {
        Self::new()
    }
}
