//! Error types for vector operations.
//!
//! All errors are reported synchronously by the call that detects them.
//! None of them is retryable: the operations are pure and deterministic,
//! so repeating a rejected call fails the same way.

use thiserror::Error;

/// Errors returned by [`PersistentVector`](crate::persistent::PersistentVector),
/// [`TransientVector`](crate::persistent::TransientVector) and the generic
/// [`splice`](crate::splice) / [`slice`](crate::slice) entry points.
///
/// # Examples
///
/// ```rust
/// use rrb_vector::VectorError;
/// use rrb_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..3).collect();
/// assert_eq!(
///     vector.nth(3),
///     Err(VectorError::OutOfBounds { index: 3, length: 3 })
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VectorError {
    /// An index outside `[0, length)`.
    #[error("index {index} out of bounds for length {length}")]
    OutOfBounds {
        /// The rejected index
        index: usize,
        /// The length of the vector at the time of the call
        length: usize,
    },
    /// A slice range that is reversed or extends past the end.
    #[error("range {start}..{end} out of bounds for length {length}")]
    InvalidRange {
        /// Inclusive start of the rejected range
        start: usize,
        /// Exclusive end of the rejected range
        end: usize,
        /// The length of the vector at the time of the call
        length: usize,
    },
    /// `pop_back` on a transient that holds no elements.
    #[error("cannot pop from an empty vector")]
    Empty,
    /// Any operation on a transient after it was persisted.
    #[error("transient used after persist")]
    UseAfterFinalize,
    /// A splice/slice operand offers neither a vector nor a sequence view.
    #[error("{type_name} offers neither a vector view nor a sequence view")]
    MissingCapability {
        /// `std::any::type_name` of the offending operand
        type_name: &'static str,
    },
}

/// A structural invariant of the tree does not hold.
///
/// Only [`PersistentVector::verify`](crate::persistent::PersistentVector::verify)
/// produces this value. Splice and slice check their results with
/// `debug_assert!`, so a violation there is fatal in debug builds.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invariant violated at shift {shift}: {message}")]
pub struct InvariantViolation {
    /// Shift of the node where the check failed
    pub shift: usize,
    /// What was wrong
    pub message: String,
}

impl InvariantViolation {
    pub(crate) fn new(shift: usize, message: impl Into<String>) -> Self {
        Self {
            shift,
            message: message.into(),
        }
    }
}
