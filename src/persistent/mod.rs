//! Persistent vector built on a Relaxed Radix Balanced trie.
//!
//! - [`PersistentVector`]: immutable vector with structural sharing,
//!   O(log n) random access, update, concatenation and slicing
//! - [`TransientVector`]: single-owner mutable builder for batch edits
//! - [`VectorLike`], [`Spliceable`], [`Sliceable`]: capability traits used
//!   by [`splice`](crate::splice) and [`slice`](crate::slice) to pick the
//!   fast tree path or a sequence fallback
//!
//! # Structural Sharing
//!
//! Every operation on a [`PersistentVector`] returns a new vector and
//! leaves the receiver untouched. Unchanged subtrees are shared between
//! versions, so only one root-to-leaf path (or the two seams of a
//! concatenation) is copied.
//!
//! # Relaxed Nodes
//!
//! A trie built by pushes alone is *regular*: every node except the
//! rightmost ones is full, so an index decomposes into 5-bit radix digits.
//! Concatenation and slicing leave partially filled nodes in the middle
//! of the tree. Those nodes are *relaxed* and carry a table of cumulative
//! child sizes that lookups search instead.
//!
//! # Examples
//!
//! ```rust
//! use rrb_vector::persistent::PersistentVector;
//!
//! let left: PersistentVector<i32> = (0..1000).collect();
//! let right: PersistentVector<i32> = (1000..1500).collect();
//!
//! let joined = left.append(&right);
//! assert_eq!(joined.len(), 1500);
//! assert_eq!(joined.get(1200), Some(&1200));
//!
//! let middle = joined.slice(990, 1010).unwrap();
//! assert_eq!(middle.first(), Some(&990));
//! assert_eq!(left.len(), 1000); // Original unchanged
//! ```
//!
//! ## Transients
//!
//! ```rust
//! use rrb_vector::persistent::TransientVector;
//! use rrb_vector::VectorError;
//!
//! # fn main() -> Result<(), VectorError> {
//! let mut transient = TransientVector::new();
//! for value in 0..100 {
//!     transient.push_back(value)?;
//! }
//! let vector = transient.persist()?;
//! assert_eq!(vector.len(), 100);
//! assert_eq!(transient.push_back(100).err(), Some(VectorError::UseAfterFinalize));
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Pointer type shared by every node.
///
/// `Rc` by default. The `arc` feature switches to `Arc` so vectors can be
/// sent between threads; transients stay thread-local either way.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

// =============================================================================
// Constants
// =============================================================================

/// Slots per node
pub(crate) const BRANCHING_FACTOR: usize = 32;

/// Index bits consumed by each tree level
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// How many nodes above the optimum a concatenation seam may keep before
/// slots are redistributed.
pub(crate) const EXTRA_SEARCH_STEPS: usize = 2;

mod capability;
mod concat;
mod edit;
mod navigator;
mod node;
mod owner;
mod slice;
mod transient;
mod vector;

pub use capability::Sequence;
pub use capability::Sliceable;
pub use capability::Spliceable;
pub use capability::VectorLike;
pub use capability::{slice, splice};
pub use transient::TransientVector;
pub use vector::PersistentVector;
pub use vector::PersistentVectorIntoIterator;
pub use vector::PersistentVectorIterator;

// =============================================================================
// Tests
// =============================================================================
