//! Deque error types.

use thiserror::Error;

/// Deque error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DequeError {
    /// Push into a deque that already holds `capacity` items.
    #[error("deque capacity exhausted ({capacity} slots)")]
    CapacityExhausted { capacity: usize },
}
