//! Visited set used to claim node identities.

use std::hash::Hash;

use dashmap::DashSet;

/// Tracks claimed node identities so each one is visited only once.
///
/// [`VisitedSet::claim`] is an atomic test-and-insert and the only
/// membership operation.
#[derive(Debug)]
pub struct VisitedSet<K: Eq + Hash> {
    claimed: DashSet<K>,
}

impl<K: Eq + Hash> VisitedSet<K> {
    /// Create an empty visited set.
    pub fn new() -> Self {
        Self {
            claimed: DashSet::new(),
        }
    }

    /// Claim an identity. Returns `true` if this call inserted it.
    ///
    /// Of any number of concurrent claims for the same identity, exactly
    /// one returns `true`.
    pub fn claim(&self, id: K) -> bool {
        self.claimed.insert(id)
    }

    /// Get the number of claimed identities.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Check if nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

impl<K: Eq + Hash> Default for VisitedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
