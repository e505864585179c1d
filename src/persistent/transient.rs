//! Transient (temporarily mutable) vector for batch updates.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::VectorError;

use super::edit::{do_assoc, pop_leaf, push_leaf};
use super::navigator::lookup;
use super::node::{Elements, Node};
use super::owner::{OwnerToken, ensure_editable};
use super::{BITS_PER_LEVEL, PersistentVector, ReferenceCounter};

// =============================================================================
// TransientVector Definition
// =============================================================================

/// A transient (temporarily mutable) vector for efficient batch updates.
///
/// A transient owns an edit session. Nodes it copies are stamped with the
/// session's token and are then mutated in place for the rest of the
/// batch, so a run of `n` pushes allocates roughly `n / 32` leaves instead
/// of copying a path per element. The vector the transient was created
/// from is never modified.
///
/// After [`persist`](Self::persist) the session is over: every further
/// call returns [`VectorError::UseAfterFinalize`].
///
/// # Design
///
/// - `PhantomData<Rc<()>>` makes the type `!Send` and `!Sync`, so a
///   session cannot leave the thread that created it
/// - Clone is not implemented; a session has exactly one owner
///
/// # Examples
///
/// ```rust
/// use rrb_vector::persistent::{PersistentVector, TransientVector};
/// use rrb_vector::VectorError;
///
/// # fn main() -> Result<(), VectorError> {
/// let base: PersistentVector<i32> = (0..10).collect();
///
/// let mut transient = base.transient();
/// transient.push_back(10)?.push_back(11)?.assoc(0, -1)?;
/// let edited = transient.persist()?;
///
/// assert_eq!(edited.len(), 12);
/// assert_eq!(edited.get(0), Some(&-1));
/// assert_eq!(base.get(0), Some(&0)); // Original unchanged
/// # Ok(())
/// # }
/// ```
pub struct TransientVector<T> {
    /// Session token; `None` once persisted
    owner: Option<OwnerToken>,
    /// Total number of elements
    length: usize,
    /// Shift of the root node
    shift: usize,
    /// Root node, owned by the session after creation
    root: ReferenceCounter<Node<T>>,
    /// Editable tail buffer
    tail: Elements<T>,
    /// Marker to ensure `!Send` and `!Sync`.
    _marker: PhantomData<Rc<()>>,
}

static_assertions::assert_not_impl_any!(TransientVector<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(TransientVector<String>: Send, Sync);

#[cfg(feature = "arc")]
mod arc_send_sync_verification_vector {
    use super::TransientVector;
    use std::sync::Arc;

    static_assertions::assert_not_impl_any!(TransientVector<Arc<i32>>: Send, Sync);
}

// =============================================================================
// TransientVector Implementation
// =============================================================================

impl<T> TransientVector<T> {
    fn token(&self) -> Result<OwnerToken, VectorError> {
        self.owner.ok_or(VectorError::UseAfterFinalize)
    }

    const fn tail_offset(&self) -> usize {
        self.length - self.tail.len()
    }

    /// Returns the number of elements.
    ///
    /// # Errors
    ///
    /// [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist).
    pub fn count(&self) -> Result<usize, VectorError> {
        self.token()?;
        Ok(self.length)
    }

    /// Returns `true` if the transient holds no elements.
    ///
    /// # Errors
    ///
    /// [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist).
    pub fn is_empty(&self) -> Result<bool, VectorError> {
        self.count().map(|count| count == 0)
    }

    /// Returns a reference to the element at `index`, or `None` if the
    /// index is out of bounds or the transient was persisted.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if self.owner.is_none() || index >= self.length {
            return None;
        }
        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail.get(index - tail_offset)
        } else {
            lookup(&self.root, self.shift, index)
        }
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// - [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist)
    /// - [`VectorError::OutOfBounds`] if `index >= count`
    pub fn nth(&self, index: usize) -> Result<&T, VectorError> {
        self.token()?;
        self.get(index).ok_or(VectorError::OutOfBounds {
            index,
            length: self.length,
        })
    }

    /// Returns the last element, or `None` if empty or persisted.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.length.checked_sub(1).and_then(|index| self.get(index))
    }
}

impl<T: Clone> TransientVector<T> {
    /// Creates an empty transient.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::TransientVector;
    ///
    /// let transient: TransientVector<i32> = TransientVector::new();
    /// assert_eq!(transient.count(), Ok(0));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            owner: Some(OwnerToken::mint()),
            length: 0,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(Node::empty_branch()),
            tail: Elements::new(),
            _marker: PhantomData,
        }
    }

    /// Opens a session on `vector`: the root is copied eagerly and the
    /// tail is copied into a full-capacity buffer.
    pub(crate) fn from_persistent(vector: &PersistentVector<T>) -> Self {
        let token = OwnerToken::mint();
        let mut root = vector.root.clone();
        ensure_editable(token, &mut root);
        Self {
            owner: Some(token),
            length: vector.length,
            shift: vector.shift,
            root,
            tail: vector.tail.elements().iter().cloned().collect(),
            _marker: PhantomData,
        }
    }

    fn push_owned(&mut self, token: OwnerToken, element: T) {
        if self.tail.is_full() {
            let tail_offset = self.tail_offset();
            let full = std::mem::take(&mut self.tail);
            let leaf = ReferenceCounter::new(Node::leaf(Some(token), full));
            push_leaf(token, &mut self.root, &mut self.shift, tail_offset, leaf);
        }
        self.tail.push(element);
        self.length += 1;
    }

    /// Pushes every element of `iter` on a session known to be open.
    pub(crate) fn extend_owned<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        if let Some(token) = self.owner {
            for element in iter {
                self.push_owned(token, element);
            }
        }
    }

    /// Appends an element.
    ///
    /// When the tail is full it is moved into the tree as a new leaf; the
    /// tree grows a level when the root has no room left.
    ///
    /// # Errors
    ///
    /// [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist).
    ///
    /// # Complexity
    ///
    /// O(1) amortized
    pub fn push_back(&mut self, element: T) -> Result<&mut Self, VectorError> {
        let token = self.token()?;
        self.push_owned(token, element);
        Ok(self)
    }

    /// Appends every element of `iter`.
    ///
    /// # Errors
    ///
    /// [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist).
    pub fn push_back_many<I: IntoIterator<Item = T>>(
        &mut self,
        iter: I,
    ) -> Result<&mut Self, VectorError> {
        self.token()?;
        self.extend_owned(iter);
        Ok(self)
    }

    /// Removes and returns the last element.
    ///
    /// When the tail runs empty the rightmost leaf of the tree becomes the
    /// new tail, and the root collapses if it is left with a single child.
    ///
    /// # Errors
    ///
    /// - [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist)
    /// - [`VectorError::Empty`] if there is nothing to remove
    pub fn pop_back(&mut self) -> Result<T, VectorError> {
        let token = self.token()?;
        let Some(element) = self.tail.pop() else {
            return Err(VectorError::Empty);
        };
        self.length -= 1;
        if self.tail.is_empty() && self.length > 0 {
            let leaf = pop_leaf(token, &mut self.root, &mut self.shift);
            self.tail = Node::into_elements(leaf);
        }
        Ok(element)
    }

    /// Replaces the element at `index`. `index == count` appends.
    ///
    /// # Errors
    ///
    /// - [`VectorError::UseAfterFinalize`] after [`persist`](Self::persist)
    /// - [`VectorError::OutOfBounds`] if `index > count`
    pub fn assoc(&mut self, index: usize, element: T) -> Result<&mut Self, VectorError> {
        let token = self.token()?;
        if index == self.length {
            self.push_owned(token, element);
            return Ok(self);
        }
        if index > self.length {
            return Err(VectorError::OutOfBounds {
                index,
                length: self.length,
            });
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail[index - tail_offset] = element;
        } else {
            do_assoc(token, self.shift, &mut self.root, index, element);
        }
        Ok(self)
    }

    /// Ends the session and returns the edited vector.
    ///
    /// The nodes keep their session stamp, but no live session holds that
    /// token any more, so later transients copy them before editing.
    ///
    /// # Errors
    ///
    /// [`VectorError::UseAfterFinalize`] if the transient was already persisted.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn persist(&mut self) -> Result<PersistentVector<T>, VectorError> {
        self.token()?;
        self.owner = None;
        tracing::debug!(length = self.length, shift = self.shift, "transient persisted");
        Ok(self.take_vector())
    }

    /// Consuming form of [`persist`](Self::persist).
    ///
    /// # Errors
    ///
    /// [`VectorError::UseAfterFinalize`] if the transient was already persisted.
    pub fn persistent(mut self) -> Result<PersistentVector<T>, VectorError> {
        self.persist()
    }

    /// Finishes a session known to be open.
    pub(crate) fn into_persistent(mut self) -> PersistentVector<T> {
        self.owner = None;
        self.take_vector()
    }

    fn take_vector(&mut self) -> PersistentVector<T> {
        let root = std::mem::replace(
            &mut self.root,
            ReferenceCounter::new(Node::empty_branch()),
        );
        let tail = std::mem::take(&mut self.tail);
        PersistentVector {
            length: self.length,
            shift: self.shift,
            root,
            tail: ReferenceCounter::new(Node::leaf(None, tail)),
        }
    }
}

impl<T: Clone> Default for TransientVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for TransientVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut transient = Self::new();
        transient.extend_owned(iter);
        transient
    }
}

// =============================================================================
// PersistentVector::transient() method
// =============================================================================

impl<T: Clone> PersistentVector<T> {
    /// Opens a transient session on this vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// let mut transient = vector.transient();
    /// transient.push_back(3).unwrap();
    /// assert_eq!(transient.persist().unwrap().len(), 4);
    /// assert_eq!(vector.len(), 3);
    /// ```
    #[must_use]
    pub fn transient(&self) -> TransientVector<T> {
        TransientVector::from_persistent(self)
    }
}
