use thiserror::Error;

/// Errors raised by [`RingStore`](crate::RingStore) accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// Logical position at or past the number of live elements.
    #[error("logical position {position} out of range (len {len})")]
    OutOfRange { position: usize, len: usize },
}
