//! # rrb-vector
//!
//! A persistent vector built on a Relaxed Radix Balanced (RRB) trie.
//!
//! ## Overview
//!
//! - **Persistent vector**: immutable, structurally shared, with
//!   effectively constant random access, update and append
//! - **Logarithmic concatenation and slicing**: partially filled nodes are
//!   allowed anywhere in the tree and carry a size table
//! - **Transients**: a single-owner mutable session that edits nodes in
//!   place once it has copied them, for fast batch construction
//! - **Capability dispatch**: [`splice`] and [`slice`] accept any
//!   [`VectorLike`](persistent::VectorLike) value and fall back to a
//!   sequence copy when the tree path is unavailable
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc` so vectors are `Send + Sync`
//!
//! ## Example
//!
//! ```rust
//! use rrb_vector::prelude::*;
//!
//! # fn main() -> Result<(), VectorError> {
//! let mut transient = TransientVector::new();
//! for value in 0..100 {
//!     transient.push_back(value)?;
//! }
//! let vector = transient.persist()?;
//!
//! assert_eq!(vector.len(), 100);
//! assert_eq!(vector.nth(42), Ok(&42));
//!
//! let head = rrb_vector::slice(&vector, 0, 50)?;
//! let rest = rrb_vector::slice(&vector, 50, 100)?;
//! assert_eq!(rrb_vector::splice(&head, &rest)?, vector);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use rrb_vector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::*;
    pub use crate::persistent::*;
}

pub mod error;
pub mod persistent;

pub use error::{InvariantViolation, VectorError};
pub use persistent::{slice, splice};
