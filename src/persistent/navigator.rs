//! Index-to-leaf navigation.
//!
//! Every step works on a *local* index, the position relative to the
//! start of the current subtree, so regular and relaxed nodes can be mixed
//! freely at any level.

use super::BITS_PER_LEVEL;
use super::node::{Node, Slots};

/// Finds the slot of `node` containing `index` and the index local to
/// that child.
///
/// For a regular branch the slot is the radix digit of `index` at `shift`.
/// For a relaxed branch it is the first slot whose cumulative count exceeds
/// `index`. For a leaf the slot is `index` itself.
pub(crate) fn find_child_slot<T>(node: &Node<T>, shift: usize, index: usize) -> (usize, usize) {
    match &node.slots {
        Slots::Leaf(_) => (index, 0),
        Slots::Regular(_) => {
            let slot = index >> shift;
            (slot, index - (slot << shift))
        }
        Slots::Relaxed(_, sizes) => {
            let slot = sizes.find(index);
            if slot < sizes.occupied() {
                (slot, index - sizes.offset_of(slot))
            } else {
                (slot, 0)
            }
        }
    }
}

/// Returns the element at `index` below `root`, or `None` if the subtree
/// is too small.
pub(crate) fn lookup<T>(root: &Node<T>, shift: usize, index: usize) -> Option<&T> {
    let mut node = root;
    let mut level = shift;
    let mut local = index;

    loop {
        let (slot, child_index) = find_child_slot(node, level, local);
        match &node.slots {
            Slots::Leaf(elements) => return elements.get(slot),
            Slots::Regular(children) | Slots::Relaxed(children, _) => {
                node = children.get(slot)?;
                level = level.checked_sub(BITS_PER_LEVEL)?;
                local = child_index;
            }
        }
    }
}
