//! Tree nodes of the relaxed radix balanced trie.
//!
//! A node sits at a *shift*: leaves are at shift 0 and hold elements, a
//! branch at shift `s` holds children at shift `s - BITS_PER_LEVEL`, each of
//! which can contain at most `1 << s` elements.
//!
//! Branches come in two kinds. A *regular* branch has every child except
//! the last completely full, so the slot for an index is a radix digit. A
//! *relaxed* branch carries a [`SizeTable`] of cumulative child counts and
//! is located by search instead. The kind is stored explicitly in
//! [`Slots`] rather than inferred from the contents.

use arrayvec::ArrayVec;

use super::owner::OwnerToken;
use super::{BITS_PER_LEVEL, BRANCHING_FACTOR, ReferenceCounter};

/// Child pointers of a branch node.
pub(crate) type Children<T> = ArrayVec<ReferenceCounter<Node<T>>, BRANCHING_FACTOR>;

/// Elements of a leaf node.
pub(crate) type Elements<T> = ArrayVec<T, BRANCHING_FACTOR>;

// =============================================================================
// Size Table
// =============================================================================

/// Cumulative element counts of a relaxed node.
///
/// `entry(i)` is the number of elements held by children `0..=i`; the
/// table length is the number of occupied children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SizeTable {
    cumulative: ArrayVec<usize, BRANCHING_FACTOR>,
}

impl SizeTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builds a table from per-child counts.
    pub(crate) fn from_counts<I: IntoIterator<Item = usize>>(counts: I) -> Self {
        let mut table = Self::new();
        for count in counts {
            table.push(count);
        }
        table
    }

    /// Number of occupied children.
    pub(crate) fn occupied(&self) -> usize {
        self.cumulative.len()
    }

    /// Total element count of the node.
    pub(crate) fn total(&self) -> usize {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub(crate) fn entry(&self, slot: usize) -> usize {
        self.cumulative[slot]
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[usize] {
        &self.cumulative
    }

    /// Element count of the child in `slot`.
    pub(crate) fn child_count(&self, slot: usize) -> usize {
        if slot == 0 {
            self.cumulative[0]
        } else {
            self.cumulative[slot] - self.cumulative[slot - 1]
        }
    }

    /// Elements held by children before `slot`.
    pub(crate) fn offset_of(&self, slot: usize) -> usize {
        if slot == 0 {
            0
        } else {
            self.cumulative[slot - 1]
        }
    }

    /// First slot whose cumulative count exceeds `index`.
    pub(crate) fn find(&self, index: usize) -> usize {
        self.cumulative.partition_point(|&cumulative| cumulative <= index)
    }

    /// Appends a child holding `count` elements.
    pub(crate) fn push(&mut self, count: usize) {
        let total = self.total();
        self.cumulative.push(total + count);
    }

    /// Removes the last child's entry.
    pub(crate) fn pop(&mut self) {
        self.cumulative.pop();
    }

    /// Adjusts the last entry after the last child grew or shrank.
    pub(crate) fn resize_last(&mut self, new_child_count: usize) {
        if let Some(slot) = self.cumulative.len().checked_sub(1) {
            let offset = self.offset_of(slot);
            self.cumulative[slot] = offset + new_child_count;
        }
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// Slot contents of a node, tagged with its kind.
#[derive(Clone)]
pub(crate) enum Slots<T> {
    /// Leaf holding up to 32 elements
    Leaf(Elements<T>),
    /// Branch with implicit, uniform child sizes
    Regular(Children<T>),
    /// Branch with an explicit size table
    Relaxed(Children<T>, SizeTable),
}

/// A node of the trie.
#[derive(Clone)]
pub(crate) struct Node<T> {
    /// Transient session allowed to mutate this node in place, if any
    pub(crate) owner: Option<OwnerToken>,
    pub(crate) slots: Slots<T>,
}

impl<T> Node<T> {
    /// Creates an empty regular branch, used as the root of a tail-only vector.
    pub(crate) fn empty_branch() -> Self {
        Self {
            owner: None,
            slots: Slots::Regular(ArrayVec::new()),
        }
    }

    pub(crate) fn leaf(owner: Option<OwnerToken>, elements: Elements<T>) -> Self {
        Self {
            owner,
            slots: Slots::Leaf(elements),
        }
    }

    /// Builds a branch from children and their cumulative sizes, choosing
    /// the regular representation whenever the sizes allow it.
    pub(crate) fn branch_with_sizes(
        owner: Option<OwnerToken>,
        children: Children<T>,
        sizes: SizeTable,
        shift: usize,
    ) -> Self {
        debug_assert_eq!(children.len(), sizes.occupied());
        let child_capacity = 1 << shift;
        let occupied = sizes.occupied();
        let regular = (0..occupied.saturating_sub(1))
            .all(|slot| sizes.entry(slot) == (slot + 1) * child_capacity);

        let slots = if regular {
            Slots::Regular(children)
        } else {
            Slots::Relaxed(children, sizes)
        };
        Self { owner, slots }
    }

    /// Builds a branch at `shift`, computing the child counts.
    pub(crate) fn branch(owner: Option<OwnerToken>, children: Children<T>, shift: usize) -> Self {
        let sizes = SizeTable::from_counts(
            children
                .iter()
                .map(|child| child.count(shift - BITS_PER_LEVEL)),
        );
        Self::branch_with_sizes(owner, children, sizes, shift)
    }

    /// Wraps `leaf` in single-child branches until it reaches `shift`.
    pub(crate) fn new_path(
        owner: Option<OwnerToken>,
        shift: usize,
        leaf: ReferenceCounter<Self>,
    ) -> ReferenceCounter<Self> {
        let mut node = leaf;
        let mut level = 0;
        while level < shift {
            level += BITS_PER_LEVEL;
            let mut children = ArrayVec::new();
            children.push(node);
            node = ReferenceCounter::new(Self {
                owner,
                slots: Slots::Regular(children),
            });
        }
        node
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        matches!(self.slots, Slots::Leaf(_))
    }

    #[cfg(test)]
    pub(crate) const fn is_relaxed(&self) -> bool {
        matches!(self.slots, Slots::Relaxed(..))
    }

    /// Children of a branch; empty for a leaf.
    pub(crate) fn child_nodes(&self) -> &[ReferenceCounter<Self>] {
        match &self.slots {
            Slots::Leaf(_) => &[],
            Slots::Regular(children) | Slots::Relaxed(children, _) => children,
        }
    }

    /// Elements of a leaf; empty for a branch.
    pub(crate) fn elements(&self) -> &[T] {
        match &self.slots {
            Slots::Leaf(elements) => elements,
            Slots::Regular(_) | Slots::Relaxed(..) => &[],
        }
    }

    /// Number of occupied slots.
    pub(crate) fn slot_count(&self) -> usize {
        match &self.slots {
            Slots::Leaf(elements) => elements.len(),
            Slots::Regular(children) | Slots::Relaxed(children, _) => children.len(),
        }
    }

    /// Total number of elements below this node.
    ///
    /// O(1) for leaves and relaxed branches, O(height) for regular branches
    /// (only the rightmost spine can be partial).
    pub(crate) fn count(&self, shift: usize) -> usize {
        match &self.slots {
            Slots::Leaf(elements) => elements.len(),
            Slots::Relaxed(_, sizes) => sizes.total(),
            Slots::Regular(children) => match children.last() {
                None => 0,
                Some(last) => {
                    ((children.len() - 1) << shift) + last.count(shift - BITS_PER_LEVEL)
                }
            },
        }
    }

    /// Element count of the child in `slot`, given this node's own `count`.
    pub(crate) fn child_count(&self, shift: usize, count: usize, slot: usize) -> usize {
        match &self.slots {
            Slots::Leaf(_) => 1,
            Slots::Relaxed(_, sizes) => sizes.child_count(slot),
            Slots::Regular(children) => {
                if slot + 1 < children.len() {
                    1 << shift
                } else {
                    count - (slot << shift)
                }
            }
        }
    }

    /// The size table of this node.
    ///
    /// Relaxed nodes return their own table. Regular nodes get a
    /// synthesized one where slot `i` holds `(i + 1) << shift`, except the
    /// last, which holds the true count.
    pub(crate) fn ranges(&self, shift: usize) -> SizeTable {
        match &self.slots {
            Slots::Relaxed(_, sizes) => sizes.clone(),
            Slots::Leaf(elements) => SizeTable::from_counts(elements.iter().map(|_| 1)),
            Slots::Regular(children) => {
                let count = self.count(shift);
                let mut table = SizeTable::new();
                for slot in 0..children.len() {
                    table.push(self.child_count(shift, count, slot));
                }
                table
            }
        }
    }

    /// Converts a regular branch holding `count` elements into a relaxed one.
    pub(crate) fn relax(&mut self, shift: usize, count: usize) {
        if let Slots::Regular(children) = &mut self.slots {
            let occupied = children.len();
            let sizes = SizeTable::from_counts((0..occupied).map(|slot| {
                if slot + 1 < occupied {
                    1 << shift
                } else {
                    count - (slot << shift)
                }
            }));
            let children = std::mem::take(children);
            self.slots = Slots::Relaxed(children, sizes);
        }
    }
}

impl<T: Clone> Node<T> {
    /// Takes the elements out of a leaf, cloning only when it is shared.
    pub(crate) fn into_elements(node: ReferenceCounter<Self>) -> Elements<T> {
        match ReferenceCounter::try_unwrap(node) {
            Ok(Self {
                slots: Slots::Leaf(elements),
                ..
            }) => elements,
            Ok(_) => ArrayVec::new(),
            Err(shared) => shared.elements().iter().cloned().collect(),
        }
    }
}

/// Collapses single-child roots and lifts a bare leaf into a branch.
///
/// Vectors always keep a branch root at shift `BITS_PER_LEVEL` or above.
pub(crate) fn normalize_root<T>(
    root: ReferenceCounter<Node<T>>,
    shift: usize,
) -> (ReferenceCounter<Node<T>>, usize) {
    if root.is_leaf() {
        let mut children = ArrayVec::new();
        children.push(root);
        return (
            ReferenceCounter::new(Node::branch(None, children, BITS_PER_LEVEL)),
            BITS_PER_LEVEL,
        );
    }

    let mut root = root;
    let mut shift = shift;
    while shift > BITS_PER_LEVEL && root.child_nodes().len() == 1 {
        let only_child = root.child_nodes()[0].clone();
        root = only_child;
        shift -= BITS_PER_LEVEL;
    }
    (root, shift)
}
