use thiserror::Error;

/// Errors returned by [`SortedWindow`](crate::SortedWindow) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Query or pop on a window holding no elements.
    #[error("{op} called on an empty window")]
    Empty { op: &'static str },
}

/// A broken structural property found by
/// [`SortedWindow::check_invariants`](crate::SortedWindow::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("element count {len} exceeds capacity {capacity}")]
    OverCapacity { len: usize, capacity: usize },

    #[error("empty window still references {field}")]
    DanglingEndpoint { field: &'static str },

    #[error("non-empty window has no {field}")]
    MissingEndpoint { field: &'static str },

    #[error("{field} slot is not live")]
    DeadSlot { field: &'static str },

    #[error("link mismatch at sorted position {position}")]
    BrokenLink { position: usize },

    #[error("chain visits {visited} nodes but the window holds {len}")]
    LengthMismatch { visited: usize, len: usize },

    #[error("chain out of order at sorted position {position}")]
    Unsorted { position: usize },

    #[error("chain does not end at the max slot")]
    WrongMax,

    #[error("median rank {rank} should be {expected}")]
    WrongMedianRank { rank: usize, expected: usize },

    #[error("median slot is not the node at rank {rank}")]
    WrongMedianSlot { rank: usize },
}
