//! Logarithmic-time slicing.
//!
//! The tree is cut along two paths: the right edge at `end` and the left
//! edge at `start`. Nodes strictly inside the range are shared; nodes on a
//! cut path are rebuilt with adjusted size tables.

use crate::error::VectorError;

use super::edit::pop_leaf;
use super::navigator::find_child_slot;
use super::node::{Children, Elements, Node, SizeTable, Slots, normalize_root};
use super::owner::OwnerToken;
use super::{BITS_PER_LEVEL, PersistentVector, ReferenceCounter};

impl<T: Clone> PersistentVector<T> {
    /// Returns the elements in `start..end` as a new vector.
    ///
    /// # Errors
    ///
    /// [`VectorError::InvalidRange`] if `start > end` or `end > len`.
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
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// let middle = vector.slice(10, 20).unwrap();
    /// assert!(middle.iter().copied().eq(10..20));
    /// assert!(vector.slice(20, 10).is_err());
    /// ```
    pub fn slice(&self, start: usize, end: usize) -> Result<Self, VectorError> {
        if start > end || end > self.length {
            return Err(VectorError::InvalidRange {
                start,
                end,
                length: self.length,
            });
        }
        Ok(self.slice_within(start, end))
    }

    /// Slices a range already known to be valid.
    pub(super) fn slice_within(&self, start: usize, end: usize) -> Self {
        if start == end {
            return Self::new();
        }
        if start == 0 && end == self.length {
            return self.clone();
        }

        let tail_offset = self.tail_offset();
        if start >= tail_offset {
            let elements: Elements<T> = self.tail.elements()[start - tail_offset..end - tail_offset]
                .iter()
                .cloned()
                .collect();
            return Self::from_tail(elements);
        }

        let tree_end = end.min(tail_offset);
        let mut root = self.root.clone();
        if tree_end < tail_offset {
            root = slice_right(&root, self.shift, tree_end);
        }
        if start > 0 {
            root = slice_left(&root, self.shift, start);
        }
        let (mut root, mut shift) = normalize_root(root, self.shift);

        let tail = if end > tail_offset {
            if end == self.length {
                self.tail.clone()
            } else {
                let elements: Elements<T> = self.tail.elements()[..end - tail_offset]
                    .iter()
                    .cloned()
                    .collect();
                ReferenceCounter::new(Node::leaf(None, elements))
            }
        } else {
            pop_leaf(OwnerToken::mint(), &mut root, &mut shift)
        };

        let result = Self {
            length: end - start,
            shift,
            root,
            tail,
        };
        debug_assert_eq!(result.verify(), Ok(()));
        result
    }
}

/// Keeps the first `end` elements below `node`, `0 < end <= count`.
fn slice_right<T: Clone>(
    node: &ReferenceCounter<Node<T>>,
    shift: usize,
    end: usize,
) -> ReferenceCounter<Node<T>> {
    match &node.slots {
        Slots::Leaf(elements) => {
            if end == elements.len() {
                return node.clone();
            }
            ReferenceCounter::new(Node::leaf(None, elements[..end].iter().cloned().collect()))
        }
        Slots::Regular(children) | Slots::Relaxed(children, _) => {
            let (slot, local) = find_child_slot(node, shift, end - 1);
            let ranges = node.ranges(shift);
            if slot + 1 == children.len() && ranges.total() == end {
                return node.clone();
            }

            let child = slice_right(&children[slot], shift - BITS_PER_LEVEL, local + 1);
            let mut kept: Children<T> = children[..slot].iter().cloned().collect();
            kept.push(child);
            let sizes = SizeTable::from_counts(
                (0..slot)
                    .map(|index| ranges.child_count(index))
                    .chain(std::iter::once(local + 1)),
            );
            ReferenceCounter::new(Node::branch_with_sizes(None, kept, sizes, shift))
        }
    }
}

/// Drops the first `start` elements below `node`, `0 < start < count`.
fn slice_left<T: Clone>(
    node: &ReferenceCounter<Node<T>>,
    shift: usize,
    start: usize,
) -> ReferenceCounter<Node<T>> {
    match &node.slots {
        Slots::Leaf(elements) => {
            ReferenceCounter::new(Node::leaf(None, elements[start..].iter().cloned().collect()))
        }
        Slots::Regular(children) | Slots::Relaxed(children, _) => {
            let (slot, local) = find_child_slot(node, shift, start);
            let ranges = node.ranges(shift);

            let first = if local == 0 {
                children[slot].clone()
            } else {
                slice_left(&children[slot], shift - BITS_PER_LEVEL, local)
            };
            let mut kept = Children::new();
            kept.push(first);
            kept.extend(children[slot + 1..].iter().cloned());

            let sizes = SizeTable::from_counts(
                std::iter::once(ranges.entry(slot) - start)
                    .chain((slot + 1..children.len()).map(|index| ranges.child_count(index))),
            );
            ReferenceCounter::new(Node::branch_with_sizes(None, kept, sizes, shift))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(0, 1)]
    #[case(10, 20)]
    #[case(0, 32)]
    #[case(31, 33)]
    #[case(32, 64)]
    #[case(1, 1999)]
    #[case(1000, 1990)]
    #[case(1990, 2000)]
    #[case(0, 2000)]
    #[case(1023, 1025)]
    fn test_slice_matches_range(#[case] start: usize, #[case] end: usize) {
        let vector: PersistentVector<usize> = (0..2000).collect();
        let sliced = vector.slice(start, end).unwrap();
        assert_eq!(sliced.len(), end - start);
        assert_eq!(sliced.verify(), Ok(()));
        assert!(sliced.iter().copied().eq(start..end));
    }

    #[rstest]
    #[case(5, 4)]
    #[case(0, 2001)]
    #[case(2001, 2001)]
    fn test_slice_rejects_invalid_range(#[case] start: usize, #[case] end: usize) {
        let vector: PersistentVector<usize> = (0..2000).collect();
        assert_eq!(
            vector.slice(start, end),
            Err(VectorError::InvalidRange {
                start,
                end,
                length: 2000
            })
        );
    }

    #[rstest]
    fn test_slice_of_relaxed_tree() {
        let left: PersistentVector<usize> = (0..77).collect();
        let right: PersistentVector<usize> = (77..3000).collect();
        let joined = left.append(&right);

        for (start, end) in [(0, 76), (50, 2500), (76, 78), (2999, 3000), (100, 2990)] {
            let sliced = joined.slice(start, end).unwrap();
            assert_eq!(sliced.verify(), Ok(()));
            assert!(sliced.iter().copied().eq(start..end));
        }
    }

    #[rstest]
    fn test_slice_collapses_root() {
        let vector: PersistentVector<usize> = (0..5000).collect();
        assert_eq!(vector.shift, 2 * BITS_PER_LEVEL);
        let sliced = vector.slice(100, 900).unwrap();
        assert_eq!(sliced.shift, BITS_PER_LEVEL);
        assert!(sliced.iter().copied().eq(100..900));
    }

    #[rstest]
    fn test_slice_shares_interior_leaves() {
        let vector: PersistentVector<usize> = (0..3000).collect();
        let sliced = vector.slice(64, 3000).unwrap();
        // Leaf 2 of the original is the first leaf of the slice.
        let original_leaf = &vector.root.child_nodes()[0].child_nodes()[2];
        let sliced_leaf = &sliced.root.child_nodes()[0].child_nodes()[0];
        assert!(ReferenceCounter::ptr_eq(original_leaf, sliced_leaf));
    }
}
