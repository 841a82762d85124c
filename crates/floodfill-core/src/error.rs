//! Error types for flood fill runs.

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::Node;
use crate::progress::FillSummary;

/// The lazy-loading step that failed for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// [`Node::visit`] failed.
    Visit,
    /// [`Node::neighbors`] failed.
    Neighbors,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visit => write!(f, "visit"),
            Self::Neighbors => write!(f, "neighbors"),
        }
    }
}

/// Underlying cause of a node failure.
#[derive(Debug, Error)]
pub enum FailureCause<E: std::error::Error + 'static> {
    /// The node returned an error.
    #[error(transparent)]
    Node(E),

    /// The node panicked; the payload message is kept when it was a string.
    #[error("panicked: {0}")]
    Panicked(String),
}

impl<E: std::error::Error + 'static> FailureCause<E> {
    /// The node's own error, if it returned one.
    pub fn node_error(&self) -> Option<&E> {
        match self {
            Self::Node(err) => Some(err),
            Self::Panicked(_) => None,
        }
    }

    /// Whether the node panicked instead of returning an error.
    pub fn is_panic(&self) -> bool {
        matches!(self, Self::Panicked(_))
    }
}

/// A node that failed during a run, together with why.
#[derive(Debug, Error)]
#[error("node {id:?} failed during {stage}: {cause}")]
pub struct VisitFailure<N: Node> {
    /// Identity of the failed node.
    pub id: N::Id,
    /// The failed node itself.
    pub node: N,
    /// Which step failed.
    pub stage: FailureStage,
    /// What went wrong.
    #[source]
    pub cause: FailureCause<N::Error>,
}

impl<N: Node> VisitFailure<N> {
    /// Record a failure returned by the node.
    pub fn new(node: N, stage: FailureStage, error: N::Error) -> Self {
        Self {
            id: node.id(),
            node,
            stage,
            cause: FailureCause::Node(error),
        }
    }

    /// Record a panic raised by the node.
    pub fn panicked(node: N, stage: FailureStage, message: impl Into<String>) -> Self {
        Self {
            id: node.id(),
            node,
            stage,
            cause: FailureCause::Panicked(message.into()),
        }
    }
}

/// Composite error for a run in which at least one node failed.
///
/// The rest of the reachable graph has still been traversed. Failures are
/// in completion order, which is not deterministic.
#[derive(Debug, Error)]
#[error("{} node(s) failed: {}", .failures.len(), .failures.iter().join(", "))]
pub struct FloodfillError<N: Node> {
    /// Every node that failed, in no particular order.
    pub failures: Vec<VisitFailure<N>>,
    /// Counters for the whole run.
    pub summary: FillSummary,
}

impl<N: Node> FloodfillError<N> {
    /// Turn collected failures into the outcome of a run.
    ///
    /// An empty failure list is success, never an empty composite.
    pub fn check(failures: Vec<VisitFailure<N>>, summary: FillSummary) -> Result<FillSummary, Self> {
        if failures.is_empty() {
            Ok(summary)
        } else {
            Err(Self { failures, summary })
        }
    }

    /// Number of failed nodes.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no failures were recorded.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Look up the failure recorded for a node identity.
    pub fn failure_for(&self, id: &N::Id) -> Option<&VisitFailure<N>> {
        self.failures.iter().find(|failure| &failure.id == id)
    }

    /// Identities of all failed nodes.
    pub fn ids(&self) -> impl Iterator<Item = &N::Id> {
        self.failures.iter().map(|failure| &failure.id)
    }
}

/// Errors that can occur when building a [`FillConfig`](crate::FillConfig).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Parallelism must allow at least one visit at a time.
    #[error("Invalid parallelism {value}: must be at least 1")]
    InvalidParallelism { value: usize },

    /// Other invalid configuration.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Stub(u32);

    #[derive(Debug, Error)]
    #[error("stub error {0}")]
    struct StubError(&'static str);

    impl Node for Stub {
        type Id = u32;
        type Error = StubError;

        fn id(&self) -> u32 {
            self.0
        }

        async fn visit(&self) -> Result<(), StubError> {
            Ok(())
        }

        async fn neighbors(&self) -> Result<Vec<Self>, StubError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_check_without_failures_is_ok() {
        let result = FloodfillError::<Stub>::check(Vec::new(), FillSummary::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_check_with_failures_is_err() {
        let failures = vec![
            VisitFailure::new(Stub(1), FailureStage::Visit, StubError("boom")),
            VisitFailure::panicked(Stub(2), FailureStage::Neighbors, "oops"),
        ];
        let err = FloodfillError::check(failures, FillSummary::default()).unwrap_err();

        assert_eq!(err.len(), 2);
        assert!(err.failure_for(&1).is_some());
        assert!(err.failure_for(&2).unwrap().cause.is_panic());
        assert!(err.failure_for(&3).is_none());
    }

    #[test]
    fn test_composite_message_joins_failures() {
        let failures = vec![
            VisitFailure::new(Stub(1), FailureStage::Visit, StubError("a")),
            VisitFailure::new(Stub(2), FailureStage::Neighbors, StubError("b")),
        ];
        let err = FloodfillError::check(failures, FillSummary::default()).unwrap_err();
        let message = err.to_string();

        assert!(message.starts_with("2 node(s) failed: "));
        assert!(message.contains("node 1 failed during visit: stub error a"));
        assert!(message.contains(", node 2 failed during neighbors: stub error b"));
    }

    #[test]
    fn test_failure_source_is_node_error() {
        use std::error::Error as _;

        let failure = VisitFailure::new(Stub(7), FailureStage::Visit, StubError("x"));
        assert_eq!(failure.id, 7);
        assert_eq!(failure.cause.node_error().unwrap().0, "x");
        assert!(failure.source().is_some());
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&FailureStage::Neighbors).unwrap();
        assert_eq!(json, "\"neighbors\"");
    }
}
