//! Pending-work queue feeding the dispatcher.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// FIFO queue of nodes waiting for the claim step.
///
/// A node may be pushed more than once; deduplication happens when a task
/// claims it, not here. Every push is paired with exactly one spawned task
/// that performs exactly one pop.
#[derive(Debug)]
pub struct WorkQueue<N> {
    state: Mutex<QueueState<N>>,
}

#[derive(Debug)]
struct QueueState<N> {
    pending: VecDeque<N>,
    pushed: u64,
}

impl<N> WorkQueue<N> {
    /// Create an empty work queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                pushed: 0,
            }),
        }
    }

    /// Append a node to the tail.
    pub fn push(&self, node: N) {
        let mut state = self.lock();
        state.pending.push_back(node);
        state.pushed += 1;
    }

    /// Remove and return the head, or `None` if nothing is pending.
    pub fn pop(&self) -> Option<N> {
        self.lock().pending.pop_front()
    }

    /// Number of nodes currently pending.
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Check if no nodes are pending.
    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    /// Total number of pushes since creation.
    pub fn pushed(&self) -> u64 {
        self.lock().pushed
    }

    // No critical section can leave the state half-updated, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, QueueState<N>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<N> Default for WorkQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
