//! Task engine turning discovered nodes into bounded concurrent visits.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::broadcast;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};

use floodfill_core::{
    FailureStage, FillConfig, FillProgress, FillSummary, FloodfillError, Node, VisitFailure,
};

use crate::aggregator::ErrorAggregator;
use crate::limiter::ParallelismLimiter;
use crate::queue::WorkQueue;
use crate::visited::VisitedSet;

/// Capacity of the progress broadcast channel.
const PROGRESS_CHANNEL_SIZE: usize = 100;

/// Flood fill engine visiting every node reachable from a set of seeds.
///
/// Each run gets a fresh visited set; nothing carries over between runs.
pub struct Floodfiller {
    config: FillConfig,
    progress_tx: broadcast::Sender<FillProgress>,
}

impl Floodfiller {
    /// Create an engine from a config.
    ///
    /// A hand-built config with zero parallelism is clamped to 1.
    pub fn new(config: FillConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self {
            config,
            progress_tx,
        }
    }

    /// Create an engine with the given parallelism and default settings.
    pub fn with_parallelism(parallelism: usize) -> Self {
        Self::new(FillConfig {
            parallelism,
            ..FillConfig::default()
        })
    }

    /// Subscribe to progress updates.
    ///
    /// A final update is always sent once a run completes.
    pub fn subscribe(&self) -> broadcast::Receiver<FillProgress> {
        self.progress_tx.subscribe()
    }

    /// The config this engine runs with.
    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Visit every node reachable from `seeds`, each identity exactly once.
    ///
    /// Returns once every discovered node has been claimed or rejected and
    /// every spawned task has finished. Failing nodes never stop the rest of
    /// the traversal; they are reported together in the error.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn run<N, I>(&self, seeds: I) -> Result<FillSummary, FloodfillError<N>>
    where
        N: Node,
        I: IntoIterator<Item = N>,
    {
        let mut parallelism = self.config.parallelism;
        if parallelism == 0 {
            warn!("parallelism of 0 requested, using 1");
            parallelism = 1;
        }

        let run = Arc::new(FillRun::new(
            parallelism,
            self.config.progress_interval,
            self.progress_tx.clone(),
        ));

        let mut seed_count = 0usize;
        for seed in seeds {
            run.enqueue(seed);
            seed_count += 1;
        }
        debug!(seeds = seed_count, parallelism, "flood fill started");

        // New tasks may still be spawned after closing; `wait` only resolves
        // once the tracker is closed and empty.
        run.tracker.close();
        run.tracker.wait().await;

        let progress = run.snapshot();
        let _ = self.progress_tx.send(progress);

        let summary = FillSummary::from(progress);
        debug!(
            discovered = summary.discovered,
            visited = summary.visited,
            duplicates = summary.duplicates,
            failed = summary.failed,
            peak = run.limiter.peak(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "flood fill finished"
        );

        run.errors.finish(summary)
    }
}

impl Default for Floodfiller {
    fn default() -> Self {
        Self::new(FillConfig::default())
    }
}

/// Visit every node reachable from `seeds` with at most `parallelism`
/// visits in flight.
///
/// A parallelism of zero is treated as 1. Must be called from within a
/// Tokio runtime.
///
/// ```rust,ignore
/// let summary = floodfill(grid.starts(), 4).await?;
/// println!("visited {} nodes", summary.visited);
/// ```
pub async fn floodfill<N, I>(seeds: I, parallelism: usize) -> Result<FillSummary, FloodfillError<N>>
where
    N: Node,
    I: IntoIterator<Item = N>,
{
    Floodfiller::with_parallelism(parallelism).run(seeds).await
}

/// Shared state of a single run.
struct FillRun<N: Node> {
    queue: WorkQueue<N>,
    visited: VisitedSet<N::Id>,
    limiter: ParallelismLimiter,
    errors: ErrorAggregator<N>,
    tracker: TaskTracker,
    counters: RunCounters,
    progress_tx: broadcast::Sender<FillProgress>,
    progress_interval: u64,
    started: Instant,
}

#[derive(Debug, Default)]
struct RunCounters {
    visited: AtomicU64,
    duplicates: AtomicU64,
    failed: AtomicU64,
}

impl<N: Node> FillRun<N> {
    fn new(
        parallelism: usize,
        progress_interval: u64,
        progress_tx: broadcast::Sender<FillProgress>,
    ) -> Self {
        Self {
            queue: WorkQueue::new(),
            visited: VisitedSet::new(),
            limiter: ParallelismLimiter::new(parallelism),
            errors: ErrorAggregator::new(),
            tracker: TaskTracker::new(),
            counters: RunCounters::default(),
            progress_tx,
            progress_interval,
            started: Instant::now(),
        }
    }

    /// Push a node and spawn the task that will pop one.
    ///
    /// The tracker counts the task before it is scheduled, and a task only
    /// finishes after enqueueing its neighbors, so the tracker cannot drain
    /// while discovered work is outstanding.
    fn enqueue(self: &Arc<Self>, node: N) {
        self.queue.push(node);
        self.tracker.spawn(Arc::clone(self).visit_next());
    }

    fn visit_next(self: Arc<Self>) -> BoxFuture<'static, ()> {
        async move {
            let Some(node) = self.queue.pop() else {
                warn!("work queue empty on dispatch");
                return;
            };

            let id = node.id();
            if !self.visited.claim(id.clone()) {
                trace!(?id, "already claimed");
                let settled = self.counters.duplicates.fetch_add(1, Ordering::AcqRel) + 1;
                self.maybe_report(settled + self.counters.visited.load(Ordering::Acquire));
                return;
            }

            trace!(?id, "claimed");
            let settled = self.counters.visited.fetch_add(1, Ordering::AcqRel) + 1;

            let neighbors = match self.limiter.acquire().await {
                Ok(_permit) => self.expand(node).await,
                Err(err) => {
                    warn!(?id, %err, "parallelism limiter closed");
                    None
                }
            };

            self.maybe_report(settled + self.counters.duplicates.load(Ordering::Acquire));

            for neighbor in neighbors.into_iter().flatten() {
                self.enqueue(neighbor);
            }
        }
        .boxed()
    }

    /// Visit a claimed node and list its neighbors, recording any failure.
    async fn expand(&self, node: N) -> Option<Vec<N>> {
        match AssertUnwindSafe(node.visit()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                self.fail(VisitFailure::new(node, FailureStage::Visit, err));
                return None;
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.fail(VisitFailure::panicked(node, FailureStage::Visit, message));
                return None;
            }
        }

        match AssertUnwindSafe(node.neighbors()).catch_unwind().await {
            Ok(Ok(neighbors)) => {
                trace!(id = ?node.id(), count = neighbors.len(), "expanded");
                Some(neighbors)
            }
            Ok(Err(err)) => {
                self.fail(VisitFailure::new(node, FailureStage::Neighbors, err));
                None
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.fail(VisitFailure::panicked(node, FailureStage::Neighbors, message));
                None
            }
        }
    }

    fn fail(&self, failure: VisitFailure<N>) {
        self.counters.failed.fetch_add(1, Ordering::AcqRel);
        self.errors.record(failure);
    }

    fn maybe_report(&self, settled: u64) {
        if self.progress_interval > 0 && settled % self.progress_interval == 0 {
            let _ = self.progress_tx.send(self.snapshot());
        }
    }

    fn snapshot(&self) -> FillProgress {
        FillProgress {
            discovered: self.queue.pushed(),
            visited: self.counters.visited.load(Ordering::Acquire),
            duplicates: self.counters.duplicates.load(Ordering::Acquire),
            failed: self.counters.failed.load(Ordering::Acquire),
            elapsed: self.started.elapsed(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
