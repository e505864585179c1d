//! Logarithmic-time concatenation.
//!
//! The right spine of the left tree and the left spine of the right tree
//! are merged level by level, from the leaves up. At each level the
//! children on both sides of the seam are collected and, if there are too
//! many under-full nodes, their slots are redistributed so that the seam
//! never holds more than `EXTRA_SEARCH_STEPS` nodes above the optimum.
//! Nodes away from the seam are shared untouched.

use smallvec::{SmallVec, smallvec};

use super::node::{Children, Elements, Node, normalize_root};
use super::{
    BITS_PER_LEVEL, BRANCHING_FACTOR, EXTRA_SEARCH_STEPS, PersistentVector, ReferenceCounter,
};

/// One or two nodes at the same shift produced by merging two subtrees.
type Merged<T> = SmallVec<[ReferenceCounter<Node<T>>; 2]>;

/// Slot counts of the nodes along a seam; at most three full levels of
/// children fit without spilling.
type Plan = SmallVec<[usize; 3 * BRANCHING_FACTOR]>;

impl<T: Clone> PersistentVector<T> {
    /// Concatenates two vectors.
    ///
    /// Neither input is modified; the result shares every subtree that is
    /// not on the seam between them.
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
    /// let left: PersistentVector<i32> = (0..50).collect();
    /// let right: PersistentVector<i32> = (50..100).collect();
    /// let joined = left.append(&right);
    ///
    /// assert_eq!(joined.len(), 100);
    /// assert!(joined.iter().copied().eq(0..100));
    /// ```
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() {
            return self.clone();
        }
        if other.tail_offset() == 0 {
            return self.push_back_many(other.tail.elements().iter().cloned());
        }

        // The left tail joins its tree; the right tail stays the tail.
        let (left_root, left_shift) = if self.tail_offset() == 0 {
            (self.tail.clone(), 0)
        } else {
            concat_trees(&self.root, self.shift, &self.tail, 0)
        };
        let (root, shift) = concat_trees(&left_root, left_shift, &other.root, other.shift);

        let result = Self {
            length: self.length + other.length,
            shift,
            root,
            tail: other.tail.clone(),
        };
        debug_assert_eq!(result.verify(), Ok(()));
        result
    }
}

/// Joins two non-empty subtrees into one normalized root.
fn concat_trees<T: Clone>(
    left: &ReferenceCounter<Node<T>>,
    left_shift: usize,
    right: &ReferenceCounter<Node<T>>,
    right_shift: usize,
) -> (ReferenceCounter<Node<T>>, usize) {
    let shift = left_shift.max(right_shift);
    let mut merged = merge(left, left_shift, right, right_shift);

    let (root, shift) = if merged.len() == 1 {
        (merged.remove(0), shift)
    } else {
        let parent_shift = shift + BITS_PER_LEVEL;
        let children: Children<T> = merged.into_iter().collect();
        (
            ReferenceCounter::new(Node::branch(None, children, parent_shift)),
            parent_shift,
        )
    };
    normalize_root(root, shift)
}

/// Merges `left` and `right` into one or two nodes at the larger shift.
fn merge<T: Clone>(
    left: &ReferenceCounter<Node<T>>,
    left_shift: usize,
    right: &ReferenceCounter<Node<T>>,
    right_shift: usize,
) -> Merged<T> {
    if left_shift > right_shift {
        let Some((last, init)) = left.child_nodes().split_last() else {
            unreachable!("merge reached an empty left branch")
        };
        let middle = merge(last, left_shift - BITS_PER_LEVEL, right, right_shift);
        rebalance(init, &middle, &[], left_shift)
    } else if left_shift < right_shift {
        let Some((first, rest)) = right.child_nodes().split_first() else {
            unreachable!("merge reached an empty right branch")
        };
        let middle = merge(left, left_shift, first, right_shift - BITS_PER_LEVEL);
        rebalance(&[], &middle, rest, right_shift)
    } else if left_shift == 0 {
        merge_leaves(left, right)
    } else {
        let (Some((last, init)), Some((first, rest))) = (
            left.child_nodes().split_last(),
            right.child_nodes().split_first(),
        ) else {
            unreachable!("merge reached an empty branch")
        };
        let middle = merge(
            last,
            left_shift - BITS_PER_LEVEL,
            first,
            right_shift - BITS_PER_LEVEL,
        );
        rebalance(init, &middle, rest, left_shift)
    }
}

fn merge_leaves<T: Clone>(
    left: &ReferenceCounter<Node<T>>,
    right: &ReferenceCounter<Node<T>>,
) -> Merged<T> {
    let (left_elements, right_elements) = (left.elements(), right.elements());
    if left_elements.len() + right_elements.len() <= BRANCHING_FACTOR {
        let elements: Elements<T> = left_elements
            .iter()
            .chain(right_elements)
            .cloned()
            .collect();
        smallvec![ReferenceCounter::new(Node::leaf(None, elements))]
    } else {
        [left.clone(), right.clone()].into_iter().collect()
    }
}

/// Rebuilds the children around a seam into one or two nodes at `shift`.
fn rebalance<T: Clone>(
    init: &[ReferenceCounter<Node<T>>],
    middle: &[ReferenceCounter<Node<T>>],
    rest: &[ReferenceCounter<Node<T>>],
    shift: usize,
) -> Merged<T> {
    let seam: Vec<&ReferenceCounter<Node<T>>> =
        init.iter().chain(middle).chain(rest).collect();
    let slot_counts: Plan = seam.iter().map(|node| node.slot_count()).collect();
    let plan = concat_plan(&slot_counts);
    if plan.len() != slot_counts.len() {
        tracing::trace!(
            shift,
            before = slot_counts.len(),
            after = plan.len(),
            "rebalanced concatenation seam"
        );
    }

    let children = redistribute(&seam, &slot_counts, &plan, shift - BITS_PER_LEVEL);
    let mut nodes = Merged::new();
    for chunk in children.chunks(BRANCHING_FACTOR) {
        let children: Children<T> = chunk.iter().cloned().collect();
        nodes.push(ReferenceCounter::new(Node::branch(None, children, shift)));
    }
    nodes
}

/// Decides how many slots each node along a seam should hold.
///
/// Starting from the current counts, while the seam has more than
/// `ceil(total / 32) + EXTRA_SEARCH_STEPS` nodes, the first under-full node
/// whose successors can absorb it is poured into them and removed.
fn concat_plan(slot_counts: &[usize]) -> Plan {
    let mut plan: Plan = slot_counts.iter().copied().collect();
    let total: usize = plan.iter().sum();
    let optimal = total.div_ceil(BRANCHING_FACTOR);

    while plan.len() > optimal + EXTRA_SEARCH_STEPS {
        let Some(start) = redistribution_start(&plan) else {
            break;
        };

        let mut carry = plan[start];
        let mut index = start;
        while carry > 0 {
            let combined = carry + plan[index + 1];
            let filled = combined.min(BRANCHING_FACTOR);
            plan[index] = filled;
            carry = combined - filled;
            index += 1;
        }
        plan.remove(index);
    }
    plan
}

/// First node that is worth emptying and whose successors have room for
/// its slots. Nodes within `EXTRA_SEARCH_STEPS / 2` of full are skipped
/// when possible.
fn redistribution_start(plan: &[usize]) -> Option<usize> {
    let fits = |index: usize| {
        let free: usize = plan[index + 1..]
            .iter()
            .map(|&slots| BRANCHING_FACTOR - slots)
            .sum();
        free >= plan[index]
    };
    let threshold = BRANCHING_FACTOR - EXTRA_SEARCH_STEPS / 2;

    (0..plan.len())
        .find(|&index| plan[index] < threshold && fits(index))
        .or_else(|| (0..plan.len()).find(|&index| plan[index] < BRANCHING_FACTOR && fits(index)))
}

/// Builds the nodes described by `plan` from the slots of `seam`.
///
/// A node whose slot count is unchanged and that starts on a node boundary
/// is reused as is.
fn redistribute<T: Clone>(
    seam: &[&ReferenceCounter<Node<T>>],
    slot_counts: &[usize],
    plan: &[usize],
    shift: usize,
) -> Vec<ReferenceCounter<Node<T>>> {
    let mut result = Vec::with_capacity(plan.len());
    let mut source = 0;
    let mut offset = 0;

    for &target in plan {
        if offset == 0 && slot_counts[source] == target {
            result.push(seam[source].clone());
            source += 1;
            continue;
        }

        if shift == 0 {
            let mut elements = Elements::new();
            while elements.len() < target {
                let available = seam[source].elements();
                let take = (target - elements.len()).min(available.len() - offset);
                elements.extend(available[offset..offset + take].iter().cloned());
                offset += take;
                if offset == available.len() {
                    source += 1;
                    offset = 0;
                }
            }
            result.push(ReferenceCounter::new(Node::leaf(None, elements)));
        } else {
            let mut children = Children::new();
            while children.len() < target {
                let available = seam[source].child_nodes();
                let take = (target - children.len()).min(available.len() - offset);
                children.extend(available[offset..offset + take].iter().cloned());
                offset += take;
                if offset == available.len() {
                    source += 1;
                    offset = 0;
                }
            }
            result.push(ReferenceCounter::new(Node::branch(None, children, shift)));
        }
    }
    result
}
