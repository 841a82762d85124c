//! Core types and traits for floodfill.
//!
//! This crate provides the [`Node`] capability that graph sources
//! implement, the failure and composite error types a run produces, and
//! the run configuration.

mod config;
mod error;
mod node;
mod progress;

pub use config::{
    DEFAULT_PARALLELISM, DEFAULT_PROGRESS_INTERVAL, FillConfig, FillConfigBuilder,
    FillConfigBuilderError,
};
pub use error::{ConfigError, FailureCause, FailureStage, FloodfillError, VisitFailure};
pub use node::Node;
pub use progress::{FillProgress, FillSummary};
