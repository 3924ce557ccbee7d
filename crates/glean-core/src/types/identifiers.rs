//! Node identifiers and the generators that hand them out.
//!
//! A `NodeId` is an opaque integer key assigned to a syntax node by an
//! explicit identity pass. It never depends on node text or memory
//! addresses, so it survives serialization into reports.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Stable identity of a syntax node within one parse/annotation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create an id from a raw value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw integer value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Source of fresh identifiers, shared read-only across files and threads.
///
/// Implementations must never return the same id twice and must return
/// strictly increasing ids to any single caller.
pub trait NodeIdGenerator: Send + Sync {
    /// Hand out the next unused id.
    fn next_id(&self) -> NodeId;
}

/// Process-wide monotonically increasing id generator.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator whose first id is `1`.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first id is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// The id the next call to `next_id` will return.
    pub fn peek(&self) -> NodeId {
        NodeId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let gen = SequentialIdGenerator::new();
        let a = gen.next_id();
        let b = gen.next_id();
        assert!(b > a);
        assert_eq!(a, NodeId(1));
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(NodeId(42).to_string(), "n42");
    }
}
