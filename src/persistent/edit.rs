//! In-place tree edits for an owned session.
//!
//! Each operation walks one root-to-leaf path and calls
//! [`ensure_editable`] on every node it changes, so nodes that belong to
//! other vectors are copied on first touch and nodes already owned by the
//! session are mutated directly.

use super::navigator::find_child_slot;
use super::node::{Node, SizeTable, Slots};
use super::owner::{OwnerToken, ensure_editable};
use super::{BITS_PER_LEVEL, BRANCHING_FACTOR, ReferenceCounter};

/// Whether another leaf fits below `node` without growing the tree.
fn has_room<T>(node: &Node<T>, shift: usize, count: usize) -> bool {
    let children = node.child_nodes();
    if children.len() < BRANCHING_FACTOR {
        return true;
    }
    if shift == BITS_PER_LEVEL {
        return false;
    }
    let last = children.len() - 1;
    let last_count = node.child_count(shift, count, last);
    last_count < 1 << shift && has_room(&children[last], shift - BITS_PER_LEVEL, last_count)
}

/// Appends `leaf` as the rightmost leaf of the subtree rooted at `node`.
///
/// `count` is the number of elements currently below `node`. The caller
/// guarantees that [`has_room`] holds. A regular node whose last child is
/// partial is converted to relaxed before it gains a new slot.
fn push_tail<T: Clone>(
    token: OwnerToken,
    shift: usize,
    count: usize,
    node: &mut ReferenceCounter<Node<T>>,
    leaf: ReferenceCounter<Node<T>>,
    leaf_len: usize,
) {
    let editable = ensure_editable(token, node);
    let child_shift = shift - BITS_PER_LEVEL;
    let child_capacity = 1 << shift;

    let occupied = editable.slot_count();
    let descend = if occupied == 0 {
        None
    } else {
        let last = occupied - 1;
        let last_count = editable.child_count(shift, count, last);
        let room_below = shift > BITS_PER_LEVEL
            && last_count < child_capacity
            && has_room(&editable.child_nodes()[last], child_shift, last_count);
        if !room_below && last_count < child_capacity {
            editable.relax(shift, count);
        }
        room_below.then_some((last, last_count))
    };

    match &mut editable.slots {
        Slots::Leaf(_) => unreachable!("push_tail descended into a leaf"),
        Slots::Regular(children) => match descend {
            Some((last, last_count)) => push_tail(
                token,
                child_shift,
                last_count,
                &mut children[last],
                leaf,
                leaf_len,
            ),
            None => children.push(Node::new_path(Some(token), child_shift, leaf)),
        },
        Slots::Relaxed(children, sizes) => match descend {
            Some((last, last_count)) => {
                push_tail(
                    token,
                    child_shift,
                    last_count,
                    &mut children[last],
                    leaf,
                    leaf_len,
                );
                sizes.resize_last(last_count + leaf_len);
            }
            None => {
                children.push(Node::new_path(Some(token), child_shift, leaf));
                sizes.push(leaf_len);
            }
        },
    }
}

/// Detaches the rightmost leaf below `node`.
///
/// Returns the leaf and whether `node` was left without children, in which
/// case the caller drops it from its parent.
fn pop_tail<T: Clone>(
    token: OwnerToken,
    shift: usize,
    node: &mut ReferenceCounter<Node<T>>,
) -> (ReferenceCounter<Node<T>>, bool) {
    let editable = ensure_editable(token, node);
    let (children, sizes) = match &mut editable.slots {
        Slots::Leaf(_) => unreachable!("pop_tail descended into a leaf"),
        Slots::Regular(children) => (children, None),
        Slots::Relaxed(children, sizes) => (children, Some(sizes)),
    };

    let (leaf, child_emptied) = if shift == BITS_PER_LEVEL {
        let Some(leaf) = children.pop() else {
            unreachable!("pop_tail reached an empty branch")
        };
        (leaf, true)
    } else {
        let Some(last) = children.last_mut() else {
            unreachable!("pop_tail reached an empty branch")
        };
        let (leaf, emptied) = pop_tail(token, shift - BITS_PER_LEVEL, last);
        if emptied {
            children.pop();
        }
        (leaf, emptied)
    };

    if let Some(sizes) = sizes {
        if child_emptied {
            sizes.pop();
        } else {
            let last = sizes.occupied() - 1;
            let remaining = sizes.child_count(last) - leaf.slot_count();
            sizes.resize_last(remaining);
        }
    }

    (leaf, children.is_empty())
}

/// Replaces the element at `index` below `node`.
///
/// The caller guarantees `index` is within the subtree.
pub(crate) fn do_assoc<T: Clone>(
    token: OwnerToken,
    shift: usize,
    node: &mut ReferenceCounter<Node<T>>,
    index: usize,
    element: T,
) {
    let editable = ensure_editable(token, node);
    let (slot, local) = find_child_slot(editable, shift, index);
    match &mut editable.slots {
        Slots::Leaf(elements) => elements[slot] = element,
        Slots::Regular(children) | Slots::Relaxed(children, _) => {
            do_assoc(
                token,
                shift - BITS_PER_LEVEL,
                &mut children[slot],
                local,
                element,
            );
        }
    }
}

/// Appends a full or partial leaf to the tree, growing a new root when the
/// current one is out of room.
///
/// `root_count` is the number of elements in the tree before the push.
pub(crate) fn push_leaf<T: Clone>(
    token: OwnerToken,
    root: &mut ReferenceCounter<Node<T>>,
    shift: &mut usize,
    root_count: usize,
    leaf: ReferenceCounter<Node<T>>,
) {
    let leaf_len = leaf.slot_count();
    if has_room(root, *shift, root_count) {
        push_tail(token, *shift, root_count, root, leaf, leaf_len);
        return;
    }

    let path = Node::new_path(Some(token), *shift, leaf);
    let old_root = std::mem::replace(root, ReferenceCounter::new(Node::empty_branch()));
    let children = [old_root, path].into_iter().collect();
    let sizes = SizeTable::from_counts([root_count, leaf_len]);
    *shift += BITS_PER_LEVEL;
    *root = ReferenceCounter::new(Node::branch_with_sizes(
        Some(token),
        children,
        sizes,
        *shift,
    ));
}

/// Removes the rightmost leaf of a non-empty tree and returns it.
///
/// The root collapses while it has a single branch child, and resets to an
/// empty branch once the last leaf is gone.
pub(crate) fn pop_leaf<T: Clone>(
    token: OwnerToken,
    root: &mut ReferenceCounter<Node<T>>,
    shift: &mut usize,
) -> ReferenceCounter<Node<T>> {
    let (leaf, emptied) = pop_tail(token, *shift, root);
    if emptied {
        *root = ReferenceCounter::new(Node::empty_branch());
        *shift = BITS_PER_LEVEL;
    } else {
        while *shift > BITS_PER_LEVEL && root.child_nodes().len() == 1 {
            let only_child = root.child_nodes()[0].clone();
            *root = only_child;
            *shift -= BITS_PER_LEVEL;
        }
    }
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::navigator::lookup;
    use rstest::rstest;

    fn leaf_of(range: std::ops::Range<usize>) -> ReferenceCounter<Node<usize>> {
        ReferenceCounter::new(Node::leaf(None, range.collect()))
    }

    fn tree_of(leaves: &[std::ops::Range<usize>]) -> (ReferenceCounter<Node<usize>>, usize, usize) {
        let token = OwnerToken::mint();
        let mut root = ReferenceCounter::new(Node::empty_branch());
        let mut shift = BITS_PER_LEVEL;
        let mut count = 0;
        for range in leaves {
            push_leaf(token, &mut root, &mut shift, count, leaf_of(range.clone()));
            count += range.len();
        }
        (root, shift, count)
    }

    #[rstest]
    fn test_push_leaf_grows_root_after_full_level() {
        let leaves: Vec<_> = (0..33).map(|n| n * 32..n * 32 + 32).collect();
        let (root, shift, count) = tree_of(&leaves);
        assert_eq!(shift, 2 * BITS_PER_LEVEL);
        assert_eq!(count, 33 * 32);
        assert!(!root.is_relaxed());
        assert_eq!(root.count(shift), count);
        for index in [0, 31, 32, 1023, 1024, 1055] {
            assert_eq!(lookup(&root, shift, index), Some(&index));
        }
    }

    #[rstest]
    fn test_push_after_partial_leaf_relaxes_parent() {
        let (root, shift, count) = tree_of(&[0..32, 32..40, 40..72]);
        assert_eq!(count, 72);
        assert!(root.is_relaxed());
        assert_eq!(root.ranges(shift).as_slice(), &[32, 40, 72]);
        for index in 0..72 {
            assert_eq!(lookup(&root, shift, index), Some(&index));
        }
    }

    #[rstest]
    fn test_pop_leaf_restores_previous_shape() {
        let leaves: Vec<_> = (0..33).map(|n| n * 32..n * 32 + 32).collect();
        let (mut root, mut shift, _) = tree_of(&leaves);
        let token = OwnerToken::mint();

        let leaf = pop_leaf(token, &mut root, &mut shift);

        assert_eq!(leaf.elements().first(), Some(&1024));
        assert_eq!(shift, BITS_PER_LEVEL);
        assert_eq!(root.count(shift), 1024);
    }

    #[rstest]
    fn test_pop_leaf_from_relaxed_updates_sizes() {
        let (mut root, mut shift, _) = tree_of(&[0..32, 32..40, 40..72]);
        let token = OwnerToken::mint();

        let leaf = pop_leaf(token, &mut root, &mut shift);
        assert_eq!(leaf.elements().len(), 32);
        assert_eq!(root.ranges(shift).as_slice(), &[32, 40]);

        pop_leaf(token, &mut root, &mut shift);
        let last = pop_leaf(token, &mut root, &mut shift);
        assert_eq!(last.elements().first(), Some(&0));
        assert_eq!(root.count(shift), 0);
        assert_eq!(shift, BITS_PER_LEVEL);
    }

    #[rstest]
    fn test_do_assoc_copies_shared_path_only() {
        let leaves: Vec<_> = (0..3).map(|n| n * 32..n * 32 + 32).collect();
        let (original, shift, _) = tree_of(&leaves);
        let mut edited = original.clone();
        let token = OwnerToken::mint();

        do_assoc(token, shift, &mut edited, 40, 4000);

        assert_eq!(lookup(&original, shift, 40), Some(&40));
        assert_eq!(lookup(&edited, shift, 40), Some(&4000));
        assert!(ReferenceCounter::ptr_eq(
            &original.child_nodes()[0],
            &edited.child_nodes()[0]
        ));
        assert!(!ReferenceCounter::ptr_eq(
            &original.child_nodes()[1],
            &edited.child_nodes()[1]
        ));
    }
}
