//! Bounded-parallelism flood fill engine for floodfill.
//!
//! This crate visits every node reachable from a set of seed nodes in a
//! graph whose edges are only discovered by visiting, with a cap on how
//! many nodes are being visited at once.
//!
//! # Overview
//!
//! - **One task per discovered node**, tracked by a completion barrier
//! - **Atomic claims** on a concurrent visited set, so every identity is
//!   visited exactly once even when discovered along many paths
//! - **Bounded concurrency** via a permit pool held only while a node is
//!   visited and its neighbors listed
//! - **Failure isolation**: failing or panicking nodes are collected into
//!   one composite error without stopping the rest of the traversal
//!
//! # Example
//!
//! ```rust,no_run
//! use floodfill_engine::{Floodfiller, FillConfig, Node};
//!
//! # async fn example<N: Node>(seeds: Vec<N>) {
//! let config = FillConfig::builder().parallelism(8usize).build().unwrap();
//! let engine = Floodfiller::new(config);
//!
//! match engine.run(seeds).await {
//!     Ok(summary) => println!("visited {} nodes", summary.visited),
//!     Err(err) => eprintln!("{} nodes failed: {err}", err.len()),
//! }
//! # }
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use floodfill_engine::Floodfiller;
//!
//! # async fn example() {
//! let engine = Floodfiller::with_parallelism(4);
//! let mut progress_rx = engine.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         println!("visited {} nodes", progress.visited);
//!     }
//! });
//! # }
//! ```

mod aggregator;
mod dispatcher;
mod limiter;
mod queue;
mod visited;

pub use aggregator::ErrorAggregator;
pub use dispatcher::{Floodfiller, floodfill};
pub use limiter::{ParallelismLimiter, Permit};
pub use queue::WorkQueue;
pub use visited::VisitedSet;

// Re-export core types for convenience
pub use floodfill_core::{
    ConfigError, FailureCause, FailureStage, FillConfig, FillProgress, FillSummary,
    FloodfillError, Node, VisitFailure,
};
