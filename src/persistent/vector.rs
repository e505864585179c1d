//! The [`PersistentVector`] type.
//!
//! A vector is a root branch plus a tail leaf of up to 32 elements. Pushes
//! and pops at the back touch only the tail until it fills or empties, at
//! which point one leaf moves between the tail and the tree. Branches are
//! regular (radix-indexed) or relaxed (size-table indexed) per node, which
//! lets [`append`](PersistentVector::append) and
//! [`slice`](PersistentVector::slice) work in logarithmic time.
//!
//! ```rust
//! use rrb_vector::persistent::PersistentVector;
//!
//! let squares: PersistentVector<u64> = (0..64).map(|n| n * n).collect();
//! let bumped = squares.update(10, 0).unwrap();
//!
//! assert_eq!(squares.get(10), Some(&100));
//! assert_eq!(bumped.get(10), Some(&0));
//! assert_eq!(bumped.last(), Some(&3969));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use crate::error::{InvariantViolation, VectorError};

use super::edit::{do_assoc, pop_leaf, push_leaf};
use super::navigator::lookup;
use super::node::{Elements, Node, Slots};
use super::owner::OwnerToken;
use super::transient::TransientVector;
use super::{BITS_PER_LEVEL, BRANCHING_FACTOR, ReferenceCounter};

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// An immutable sequence with structural sharing.
///
/// Cloning is O(1). Every "modifying" method returns a new vector and
/// leaves `self` as it was.
///
/// | Operation                        | Cost                  |
/// |----------------------------------|-----------------------|
/// | `get`, `update`                  | O(log32 N)            |
/// | `push_back`, `pop_back`          | O(1) amortized        |
/// | `append`, `slice`, `push_front`  | O(log N)              |
/// | `len`, `last`                    | O(1)                  |
///
/// ```rust
/// use rrb_vector::persistent::PersistentVector;
///
/// let letters: PersistentVector<char> = "persistent".chars().collect();
/// assert_eq!(letters.len(), 10);
/// assert_eq!(letters.get(3), Some(&'s'));
/// ```
#[derive(Clone)]
pub struct PersistentVector<T> {
    pub(super) length: usize,
    /// Shift of the root node; at least `BITS_PER_LEVEL`
    pub(super) shift: usize,
    /// Root node of the trie, always a branch
    pub(super) root: ReferenceCounter<Node<T>>,
    /// Tail leaf (up to 32 elements); non-empty whenever the vector is
    pub(super) tail: ReferenceCounter<Node<T>>,
}

impl<T> PersistentVector<T> {
    /// The empty vector.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::from_tail(Elements::new())
    }

    /// Builds a vector whose elements all live in the tail.
    pub(super) fn from_tail(elements: Elements<T>) -> Self {
        Self {
            length: elements.len(),
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(Node::empty_branch()),
            tail: ReferenceCounter::new(Node::leaf(None, elements)),
        }
    }

    /// A one-element vector; the element lives in the tail.
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let one = PersistentVector::singleton("x");
    /// assert_eq!((one.len(), one.last()), (1, Some(&"x")));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        let mut elements = Elements::new();
        elements.push(element);
        Self::from_tail(elements)
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Whether the vector has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Index of the first tail element.
    #[inline]
    pub(super) fn tail_offset(&self) -> usize {
        self.length - self.tail.slot_count()
    }

    /// The element at `index`, or `None` past the end.
    ///
    /// Indices below the tail go through the tree: radix digits in regular
    /// branches, a size-table search in relaxed ones.
    ///
    /// # Arguments
    ///
    /// * `index` - Position counted from the front
    ///
    /// # Complexity
    ///
    /// O(log32 N), O(1) inside the tail
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<u32> = (10..20).collect();
    /// assert_eq!(vector.get(9), Some(&19));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail.elements().get(index - tail_offset)
        } else {
            lookup(&self.root, self.shift, index)
        }
    }

    /// Like [`get`](Self::get), but reports a missing index as an error.
    ///
    /// # Arguments
    ///
    /// * `index` - Position counted from the front
    ///
    /// # Errors
    ///
    /// [`VectorError::OutOfBounds`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    /// use rrb_vector::VectorError;
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// assert_eq!(vector.nth(42), Ok(&42));
    /// assert_eq!(
    ///     vector.nth(100),
    ///     Err(VectorError::OutOfBounds { index: 100, length: 100 })
    /// );
    /// ```
    pub fn nth(&self, index: usize) -> Result<&T, VectorError> {
        self.get(index).ok_or(VectorError::OutOfBounds {
            index,
            length: self.length,
        })
    }

    /// The front element, if any.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// The back element, if any. Always read from the tail.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.elements().last()
    }

    /// Front-to-back iterator over references.
    ///
    /// Each leaf is visited once, so a full pass is O(N).
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<u8> = (1..=4).collect();
    /// assert_eq!(vector.iter().copied().sum::<u8>(), 10);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator::new(self)
    }

    /// Checks the structural invariants of the whole tree.
    ///
    /// Verifies that leaves sit at shift 0 and are non-empty, that every
    /// child of a regular branch except the last is full, that size tables
    /// match the actual child counts, that the root is collapsed, and that
    /// the tree and tail account for exactly `len` elements.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let left: PersistentVector<i32> = (0..500).collect();
    /// let right: PersistentVector<i32> = (0..700).collect();
    /// assert_eq!(left.append(&right).verify(), Ok(()));
    /// ```
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let tail_len = match &self.tail.slots {
            Slots::Leaf(elements) => elements.len(),
            Slots::Regular(_) | Slots::Relaxed(..) => {
                return Err(InvariantViolation::new(0, "tail is not a leaf"));
            }
        };
        if self.length > 0 && tail_len == 0 {
            return Err(InvariantViolation::new(0, "empty tail in a non-empty vector"));
        }
        if self.shift < BITS_PER_LEVEL || self.root.is_leaf() {
            return Err(InvariantViolation::new(
                self.shift,
                "root must be a branch at shift 5 or above",
            ));
        }
        if self.shift > BITS_PER_LEVEL && self.root.child_nodes().len() < 2 {
            return Err(InvariantViolation::new(
                self.shift,
                "root above the lowest branch level has fewer than two children",
            ));
        }

        let tree_count = verify_node(&self.root, self.shift, true)?;
        if tree_count + tail_len != self.length {
            return Err(InvariantViolation::new(
                self.shift,
                format!(
                    "tree holds {tree_count} and tail {tail_len} elements, but length is {}",
                    self.length
                ),
            ));
        }
        Ok(())
    }
}

/// Checks the subtree below `node` and returns its element count.
fn verify_node<T>(node: &Node<T>, shift: usize, is_root: bool) -> Result<usize, InvariantViolation> {
    match &node.slots {
        Slots::Leaf(elements) => {
            if shift != 0 {
                return Err(InvariantViolation::new(shift, "leaf above level 0"));
            }
            if elements.is_empty() {
                return Err(InvariantViolation::new(0, "empty leaf"));
            }
            Ok(elements.len())
        }
        Slots::Regular(_) | Slots::Relaxed(..) if shift == 0 => {
            Err(InvariantViolation::new(0, "branch at leaf level"))
        }
        Slots::Regular(children) => {
            let capacity = 1 << shift;
            let mut total = 0;
            for (slot, child) in children.iter().enumerate() {
                let count = verify_node(child, shift - BITS_PER_LEVEL, false)?;
                if slot + 1 < children.len() && count != capacity {
                    return Err(InvariantViolation::new(
                        shift,
                        format!("regular child {slot} holds {count} of {capacity} elements"),
                    ));
                }
                total += count;
            }
            if total == 0 && !is_root {
                return Err(InvariantViolation::new(shift, "empty branch"));
            }
            Ok(total)
        }
        Slots::Relaxed(children, sizes) => {
            if sizes.occupied() != children.len() {
                return Err(InvariantViolation::new(
                    shift,
                    format!(
                        "size table has {} entries for {} children",
                        sizes.occupied(),
                        children.len()
                    ),
                ));
            }
            if children.is_empty() {
                return Err(InvariantViolation::new(shift, "empty relaxed branch"));
            }
            let mut total = 0;
            for (slot, child) in children.iter().enumerate() {
                total += verify_node(child, shift - BITS_PER_LEVEL, false)?;
                if sizes.entry(slot) != total {
                    return Err(InvariantViolation::new(
                        shift,
                        format!(
                            "size table entry {slot} is {} but children hold {total}",
                            sizes.entry(slot)
                        ),
                    ));
                }
            }
            Ok(total)
        }
    }
}

impl<T: Clone> PersistentVector<T> {
    /// A copy of the vector with `element` added at the back.
    ///
    /// Only the tail is copied until it fills up. A full tail is hung into
    /// the tree as a shared leaf, copying one root-to-leaf path.
    ///
    /// # Arguments
    ///
    /// * `element` - The value to add at the back
    ///
    /// # Complexity
    ///
    /// O(1) amortized, O(log32 N) when the tail is full
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::new().push_back(1).push_back(2);
    /// assert_eq!(vector.len(), 2);
    /// assert_eq!(vector.get(1), Some(&2));
    /// ```
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        let tail = self.tail.elements();
        if tail.len() < BRANCHING_FACTOR {
            let mut elements: Elements<T> = tail.iter().cloned().collect();
            elements.push(element);
            return Self {
                length: self.length + 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::new(Node::leaf(None, elements)),
            };
        }

        // The full tail becomes a shared leaf of the new tree.
        let token = OwnerToken::mint();
        let mut root = self.root.clone();
        let mut shift = self.shift;
        push_leaf(token, &mut root, &mut shift, self.tail_offset(), self.tail.clone());

        let mut elements = Elements::new();
        elements.push(element);
        Self {
            length: self.length + 1,
            shift,
            root,
            tail: ReferenceCounter::new(Node::leaf(None, elements)),
        }
    }

    /// Appends all elements from an iterator, using one transient session.
    ///
    /// # Arguments
    ///
    /// * `iter` - Elements to add, in order
    ///
    /// # Complexity
    ///
    /// O(M) amortized for M new elements; `self` is copied only along the
    /// edited path
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..3).collect();
    /// let extended = vector.push_back_many(3..100);
    /// assert_eq!(extended.len(), 100);
    /// assert_eq!(vector.len(), 3);
    /// ```
    #[must_use]
    pub fn push_back_many<I>(&self, iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut transient = self.transient();
        transient.extend_owned(iter);
        transient.into_persistent()
    }

    /// Splits off the back element, or `None` for an empty vector.
    ///
    /// When the tail would become empty, the last tree leaf moves up to
    /// serve as the new tail.
    ///
    /// # Complexity
    ///
    /// O(1) amortized, O(log32 N) when the tail empties
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let (remaining, element) = vector.pop_back().unwrap();
    /// assert_eq!(element, 3);
    /// assert_eq!(remaining.len(), 2);
    /// ```
    #[must_use]
    pub fn pop_back(&self) -> Option<(Self, T)> {
        let tail = self.tail.elements();
        let element = tail.last()?.clone();

        if tail.len() > 1 || self.length == 1 {
            let elements: Elements<T> = tail[..tail.len() - 1].iter().cloned().collect();
            return Some((
                Self {
                    length: self.length - 1,
                    shift: self.shift,
                    root: self.root.clone(),
                    tail: ReferenceCounter::new(Node::leaf(None, elements)),
                },
                element,
            ));
        }

        let token = OwnerToken::mint();
        let mut root = self.root.clone();
        let mut shift = self.shift;
        let leaf = pop_leaf(token, &mut root, &mut shift);
        Some((
            Self {
                length: self.length - 1,
                shift,
                root,
                tail: leaf,
            },
            element,
        ))
    }

    /// Prepends an element by joining a singleton with this vector.
    ///
    /// # Arguments
    ///
    /// * `element` - The value to add at the front
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let prepended = vector.push_front(0);
    /// assert_eq!(prepended.first(), Some(&0));
    /// assert_eq!(prepended.len(), 4);
    /// ```
    #[must_use]
    pub fn push_front(&self, element: T) -> Self {
        Self::singleton(element).append(self)
    }

    /// Splits off the front element, or `None` for an empty vector.
    /// Implemented as a slice from index 1.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn pop_front(&self) -> Option<(Self, T)> {
        let element = self.first()?.clone();
        Some((self.slice_within(1, self.length), element))
    }

    /// A copy with the element at `index` replaced, or `None` past the end.
    ///
    /// Shares everything except the path down to the edited leaf.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the element to replace
    /// * `element` - The replacement value
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// let updated = vector.update(50, 999).unwrap();
    /// assert_eq!(vector.get(50), Some(&50));
    /// assert_eq!(updated.get(50), Some(&999));
    /// assert!(vector.update(100, 0).is_none());
    /// ```
    #[must_use]
    pub fn update(&self, index: usize, element: T) -> Option<Self> {
        if index >= self.length {
            return None;
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            let mut elements: Elements<T> = self.tail.elements().iter().cloned().collect();
            elements[index - tail_offset] = element;
            return Some(Self {
                length: self.length,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::new(Node::leaf(None, elements)),
            });
        }

        let token = OwnerToken::mint();
        let mut root = self.root.clone();
        do_assoc(token, self.shift, &mut root, index, element);
        Some(Self {
            length: self.length,
            shift: self.shift,
            root,
            tail: self.tail.clone(),
        })
    }

    /// Prefix of at most `count` elements; a larger `count` is clamped.
    ///
    /// # Arguments
    ///
    /// * `count` - Number of leading elements to keep
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.take(3).len(), 3);
    /// assert_eq!(vector.take(10).len(), 5);
    /// ```
    #[must_use]
    pub fn take(&self, count: usize) -> Self {
        self.slice_within(0, count.min(self.length))
    }

    /// Everything after the first `count` elements. Clamps like [`take`].
    ///
    /// # Arguments
    ///
    /// * `count` - Number of leading elements to skip
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rrb_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.drop_first(2).first(), Some(&3));
    /// assert!(vector.drop_first(10).is_empty());
    /// ```
    ///
    /// [`take`]: Self::take
    #[must_use]
    pub fn drop_first(&self, count: usize) -> Self {
        self.slice_within(count.min(self.length), self.length)
    }

    /// `(take(index), drop_first(index))`.
    ///
    /// # Arguments
    ///
    /// * `index` - First position of the second half
    #[must_use]
    pub fn split_at(&self, index: usize) -> (Self, Self) {
        (self.take(index), self.drop_first(index))
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Borrowing iterator over a [`PersistentVector`].
///
/// Walks the tree depth first, one leaf at a time, and finishes with the
/// tail. Regular and relaxed branches are walked the same way.
pub struct PersistentVectorIterator<'a, T> {
    /// Branches on the path to the current leaf, each with the next slot to visit
    pending: Vec<(&'a [ReferenceCounter<Node<T>>], usize)>,
    /// Unvisited elements of the current leaf
    leaf: &'a [T],
    /// The tail, until the walk reaches it
    tail: Option<&'a [T]>,
    remaining: usize,
}

impl<'a, T> PersistentVectorIterator<'a, T> {
    fn new(vector: &'a PersistentVector<T>) -> Self {
        let mut pending = Vec::with_capacity(vector.shift / BITS_PER_LEVEL + 1);
        pending.push((vector.root.child_nodes(), 0));
        Self {
            pending,
            leaf: &[],
            tail: Some(vector.tail.elements()),
            remaining: vector.length,
        }
    }

    /// Moves to the next leaf of the tree, or to the tail once the tree is
    /// exhausted. Returns `false` when nothing is left.
    fn advance(&mut self) -> bool {
        while let Some((children, next)) = self.pending.last_mut() {
            let children: &'a [ReferenceCounter<Node<T>>] = *children;
            let Some(child) = children.get(*next) else {
                self.pending.pop();
                continue;
            };
            *next += 1;
            let child: &'a Node<T> = child;
            match &child.slots {
                Slots::Leaf(elements) => {
                    self.leaf = elements.as_slice();
                    return true;
                }
                Slots::Regular(grandchildren) | Slots::Relaxed(grandchildren, _) => {
                    self.pending.push((grandchildren.as_slice(), 0));
                }
            }
        }
        match self.tail.take() {
            Some(tail) => {
                self.leaf = tail;
                true
            }
            None => false,
        }
    }
}

impl<'a, T> Iterator for PersistentVectorIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((element, rest)) = self.leaf.split_first() {
                self.leaf = rest;
                self.remaining -= 1;
                return Some(element);
            }
            if !self.advance() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for PersistentVectorIterator<'_, T> {}

/// Owning iterator over a [`PersistentVector`].
///
/// The vector's nodes may be shared with other vectors, so elements are
/// cloned out of each leaf rather than moved.
pub struct PersistentVectorIntoIterator<T> {
    /// Branches on the path to the current leaf, each with the next slot to visit
    pending: Vec<(ReferenceCounter<Node<T>>, usize)>,
    /// Current leaf and the position of its next element
    leaf: Option<(ReferenceCounter<Node<T>>, usize)>,
    tail: Option<ReferenceCounter<Node<T>>>,
    remaining: usize,
}

impl<T: Clone> PersistentVectorIntoIterator<T> {
    fn new(vector: PersistentVector<T>) -> Self {
        let PersistentVector {
            length, root, tail, ..
        } = vector;
        Self {
            pending: vec![(root, 0)],
            leaf: None,
            tail: Some(tail),
            remaining: length,
        }
    }

    fn advance(&mut self) -> bool {
        while let Some((node, next)) = self.pending.last_mut() {
            let Some(child) = node.child_nodes().get(*next).cloned() else {
                self.pending.pop();
                continue;
            };
            *next += 1;
            if child.is_leaf() {
                self.leaf = Some((child, 0));
                return true;
            }
            self.pending.push((child, 0));
        }
        self.leaf = self.tail.take().map(|tail| (tail, 0));
        self.leaf.is_some()
    }
}

impl<T: Clone> Iterator for PersistentVectorIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((leaf, position)) = &mut self.leaf
                && let Some(element) = leaf.elements().get(*position)
            {
                *position += 1;
                self.remaining -= 1;
                return Some(element.clone());
            }
            if !self.advance() {
                return None;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentVectorIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut transient = TransientVector::new();
        transient.extend_owned(iter);
        transient.into_persistent()
    }
}

impl<T: Clone> IntoIterator for PersistentVector<T> {
    type Item = T;
    type IntoIter = PersistentVectorIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentVectorIntoIterator::new(self)
    }
}

impl<'a, T> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = PersistentVectorIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

/// Hashes the length, then every element in order.
///
/// Two vectors with the same elements hash equally whatever their tree
/// shape, so a concatenated vector and a pushed one are interchangeable
/// as map keys.
impl<T: Hash> Hash for PersistentVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Thread Safety Tests (arc feature only)
// =============================================================================
