//! Capability-based dispatch for splice and slice.
//!
//! An operand advertises what it can offer through [`VectorLike`]:
//!
//! - a tree view ([`VectorLike::as_persistent_vector`]), which enables the
//!   O(log n) paths
//! - a sequence view ([`VectorLike::sequence`]), which enables an O(n)
//!   fallback that copies elements into a new vector
//!
//! [`Spliceable`] and [`Sliceable`] are implemented for every `VectorLike`
//! and pick the best path the operands allow. An operand that offers
//! neither view is rejected with [`VectorError::MissingCapability`].

use std::any::type_name;
use std::collections::VecDeque;

use crate::error::VectorError;

use super::{PersistentVector, TransientVector};

/// Borrowed, front-to-back sequence of elements.
pub type Sequence<'a, T> = Box<dyn ExactSizeIterator<Item = &'a T> + 'a>;

/// A value that can take part in [`splice`] and [`slice`].
///
/// Both methods default to `None`; implementors override the views they
/// can provide.
///
/// # Examples
///
/// ```rust
/// use rrb_vector::persistent::{PersistentVector, VectorLike};
///
/// struct Countdown(Vec<u8>);
///
/// impl VectorLike<u8> for Countdown {
///     fn sequence(&self) -> Option<Box<dyn ExactSizeIterator<Item = &u8> + '_>> {
///         Some(Box::new(self.0.iter()))
///     }
/// }
///
/// let tail = Countdown(vec![3, 2, 1]);
/// let head: PersistentVector<u8> = [5, 4].into_iter().collect();
/// let joined = rrb_vector::splice(&head, &tail).unwrap();
/// assert!(joined.iter().copied().eq([5, 4, 3, 2, 1]));
/// ```
pub trait VectorLike<T> {
    /// The tree this value is backed by, if any.
    fn as_persistent_vector(&self) -> Option<&PersistentVector<T>> {
        None
    }

    /// The elements of this value in order, if they can be enumerated.
    fn sequence(&self) -> Option<Sequence<'_, T>> {
        None
    }
}

/// Values that can be concatenated with another [`VectorLike`].
pub trait Spliceable<T>: VectorLike<T> {
    /// Concatenates `self` and `other` into a new vector.
    ///
    /// # Errors
    ///
    /// [`VectorError::MissingCapability`] naming the operand that offers
    /// neither a tree nor a sequence view.
    fn splice_with<O>(&self, other: &O) -> Result<PersistentVector<T>, VectorError>
    where
        O: VectorLike<T> + ?Sized;
}

/// Values that can be cut to a sub-range.
pub trait Sliceable<T>: VectorLike<T> {
    /// Returns the elements in `start..end` as a new vector.
    ///
    /// # Errors
    ///
    /// - [`VectorError::InvalidRange`] if `start > end` or `end` exceeds the length
    /// - [`VectorError::MissingCapability`] if `self` offers no view at all
    fn slice_range(&self, start: usize, end: usize) -> Result<PersistentVector<T>, VectorError>;
}

fn sequence_of<T, V>(value: &V) -> Result<Sequence<'_, T>, VectorError>
where
    V: VectorLike<T> + ?Sized,
{
    value.sequence().ok_or(VectorError::MissingCapability {
        type_name: type_name::<V>(),
    })
}

impl<T, V> Spliceable<T> for V
where
    T: Clone,
    V: VectorLike<T> + ?Sized,
{
    fn splice_with<O>(&self, other: &O) -> Result<PersistentVector<T>, VectorError>
    where
        O: VectorLike<T> + ?Sized,
    {
        match (self.as_persistent_vector(), other.as_persistent_vector()) {
            (Some(left), Some(right)) => Ok(left.append(right)),
            (Some(left), None) => {
                let right = sequence_of(other)?;
                tracing::debug!(operand = type_name::<O>(), "splice falling back to sequence");
                Ok(left.push_back_many(right.cloned()))
            }
            (None, right_vector) => {
                let left = sequence_of(self)?;
                tracing::debug!(operand = type_name::<V>(), "splice falling back to sequence");
                let mut transient: TransientVector<T> = left.cloned().collect();
                match right_vector {
                    Some(right) => {
                        let left = transient.persistent()?;
                        Ok(left.append(right))
                    }
                    None => {
                        let right = sequence_of(other)?;
                        transient.push_back_many(right.cloned())?;
                        transient.persistent()
                    }
                }
            }
        }
    }
}

impl<T, V> Sliceable<T> for V
where
    T: Clone,
    V: VectorLike<T> + ?Sized,
{
    fn slice_range(&self, start: usize, end: usize) -> Result<PersistentVector<T>, VectorError> {
        if let Some(vector) = self.as_persistent_vector() {
            return PersistentVector::slice(vector, start, end);
        }

        let elements = sequence_of(self)?;
        let length = elements.len();
        if start > end || end > length {
            return Err(VectorError::InvalidRange { start, end, length });
        }
        tracing::debug!(operand = type_name::<V>(), "slice falling back to sequence");
        Ok(elements.skip(start).take(end - start).cloned().collect())
    }
}

/// Concatenates two vector-like values.
///
/// Takes the O(log n) path when both operands are [`PersistentVector`]s
/// and copies through a transient otherwise.
///
/// # Errors
///
/// [`VectorError::MissingCapability`] if an operand offers neither a tree
/// nor a sequence view.
///
/// # Examples
///
/// ```rust
/// use rrb_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// let first = vector.slice(0, 50).unwrap();
/// let second = vector.slice(50, 100).unwrap();
/// assert_eq!(rrb_vector::splice(&first, &second), Ok(vector));
///
/// let mixed = rrb_vector::splice(&vec![1, 2], &[3, 4]).unwrap();
/// assert_eq!(mixed.len(), 4);
/// ```
pub fn splice<T, A, B>(left: &A, right: &B) -> Result<PersistentVector<T>, VectorError>
where
    T: Clone,
    A: VectorLike<T> + ?Sized,
    B: VectorLike<T> + ?Sized,
{
    left.splice_with(right)
}

/// Returns the elements of a vector-like value in `start..end`.
///
/// # Errors
///
/// - [`VectorError::InvalidRange`] if `start > end` or `end` exceeds the length
/// - [`VectorError::MissingCapability`] if the value offers no view at all
///
/// # Examples
///
/// ```rust
/// let sliced = rrb_vector::slice(&vec![0, 1, 2, 3, 4], 1, 3).unwrap();
/// assert!(sliced.iter().copied().eq([1, 2]));
/// ```
pub fn slice<T, V>(vector: &V, start: usize, end: usize) -> Result<PersistentVector<T>, VectorError>
where
    T: Clone,
    V: VectorLike<T> + ?Sized,
{
    Sliceable::slice_range(vector, start, end)
}

// =============================================================================
// VectorLike Implementations
// =============================================================================

impl<T> VectorLike<T> for PersistentVector<T> {
    fn as_persistent_vector(&self) -> Option<&PersistentVector<T>> {
        Some(self)
    }

    fn sequence(&self) -> Option<Sequence<'_, T>> {
        Some(Box::new(self.iter()))
    }
}

impl<T> VectorLike<T> for [T] {
    fn sequence(&self) -> Option<Sequence<'_, T>> {
        Some(Box::new(self.iter()))
    }
}

impl<T, const N: usize> VectorLike<T> for [T; N] {
    fn sequence(&self) -> Option<Sequence<'_, T>> {
        Some(Box::new(self.iter()))
    }
}

impl<T> VectorLike<T> for Vec<T> {
    fn sequence(&self) -> Option<Sequence<'_, T>> {
        Some(Box::new(self.iter()))
    }
}

impl<T> VectorLike<T> for VecDeque<T> {
    fn sequence(&self) -> Option<Sequence<'_, T>> {
        Some(Box::new(self.iter()))
    }
}
