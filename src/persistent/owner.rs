//! Ownership tokens for transient edit sessions.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use super::ReferenceCounter;
use super::node::Node;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identity of one edit session.
///
/// Two tokens compare equal only if they came from the same call to
/// [`OwnerToken::mint`]. A node stamped with a token may be mutated in
/// place by the session holding that token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct OwnerToken(NonZeroU64);

impl OwnerToken {
    /// Creates a token distinct from every other token minted in this process.
    ///
    /// # Panics
    ///
    /// If the process has minted `u64::MAX - 1` tokens already.
    pub(crate) fn mint() -> Self {
        match take_id(&NEXT_TOKEN) {
            Some(id) => Self(id),
            None => unreachable!("owner token counter exhausted"),
        }
    }
}

/// Takes the next id from `counter`, or `None` once it cannot advance.
/// An exhausted counter stays exhausted rather than wrapping.
fn take_id(counter: &AtomicU64) -> Option<NonZeroU64> {
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |id| id.checked_add(1))
        .ok()
        .and_then(NonZeroU64::new)
}

/// Returns a mutable view of `*node` that is owned by `token`.
///
/// A node stamped by another session (or by none) is first replaced in
/// its slot by a fresh copy carrying `token`; the copy clones the size
/// table along with the slots. Nodes already owned by the session are
/// edited in place.
pub(crate) fn ensure_editable<T: Clone>(
    token: OwnerToken,
    node: &mut ReferenceCounter<Node<T>>,
) -> &mut Node<T> {
    if node.owner != Some(token) {
        let copy = Node {
            owner: Some(token),
            slots: node.slots.clone(),
        };
        *node = ReferenceCounter::new(copy);
    }
    ReferenceCounter::make_mut(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistent::node::Slots;
    use rstest::rstest;

    #[rstest]
    fn test_minted_tokens_are_distinct() {
        let first = OwnerToken::mint();
        let second = OwnerToken::mint();
        assert_ne!(first, second);
        assert_eq!(first, first);
    }

    #[rstest]
    fn test_minted_tokens_increase() {
        let tokens: Vec<OwnerToken> = (0..100).map(|_| OwnerToken::mint()).collect();
        assert!(tokens.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[rstest]
    fn test_exhausted_counter_does_not_wrap() {
        let counter = AtomicU64::new(u64::MAX - 1);
        assert_eq!(take_id(&counter).map(NonZeroU64::get), Some(u64::MAX - 1));
        assert_eq!(take_id(&counter), None);
        assert_eq!(take_id(&counter), None);
        assert_eq!(counter.load(Ordering::Relaxed), u64::MAX);
    }

    #[rstest]
    fn test_ensure_editable_copies_foreign_node() {
        let original = ReferenceCounter::new(Node::leaf(None, (0..4).collect()));
        let mut slot = original.clone();
        let token = OwnerToken::mint();

        if let Slots::Leaf(elements) = &mut ensure_editable(token, &mut slot).slots {
            elements[0] = 99;
        }

        assert!(!ReferenceCounter::ptr_eq(&original, &slot));
        assert_eq!(original.elements(), &[0, 1, 2, 3]);
        assert_eq!(slot.elements(), &[99, 1, 2, 3]);
        assert_eq!(slot.owner, Some(token));
    }

    #[rstest]
    fn test_ensure_editable_reuses_owned_node() {
        let token = OwnerToken::mint();
        let mut slot = ReferenceCounter::new(Node::leaf(Some(token), (0..4).collect()));
        let before = ReferenceCounter::as_ptr(&slot);

        ensure_editable(token, &mut slot);

        assert_eq!(ReferenceCounter::as_ptr(&slot), before);
    }
}
