//! Card instance identification.
//!
//! Every drawn copy of a card gets an `InstanceId` that is unique across the
//! whole match and both seats.
//!
//! ## Allocation
//!
//! Ids come from an `InstanceIdGen` carried inside the match state. Both
//! replicas start from the same generator and allocate in command order, so
//! the same command history yields the same ids on both peers. Tests inject
//! a different starting point via `MatchConfig::first_instance_id`.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl From<u64> for InstanceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Deterministic instance id allocator.
///
/// ```
/// use duel_engine::core::{InstanceId, InstanceIdGen};
///
/// let mut ids = InstanceIdGen::starting_at(100);
/// assert_eq!(ids.alloc(), InstanceId(100));
/// assert_eq!(ids.alloc(), InstanceId(101));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceIdGen {
    next: u64,
}

impl InstanceIdGen {
    /// Create a generator whose first id is `first`.
    #[must_use]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Allocate the next id.
    pub fn alloc(&mut self) -> InstanceId {
        let id = InstanceId(self.next);
        self.next += 1;
        id
    }
}

impl Default for InstanceIdGen {
    fn default() -> Self {
        Self::starting_at(1)
    }
}
