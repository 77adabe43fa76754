//! Error taxonomy for the cordon solvers and their tree structures.
//!
//! Every variant here is an invalid-input condition detected synchronously,
//! before any parallel work is dispatched. Logical impossible states (a
//! child index escaping the tree array) are construction bugs and abort via
//! debug assertions instead. Lost races in the lock-free tournament tree
//! are *not* errors: those calls return the sentinel value.

use thiserror::Error;

/// Alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Any invalid-input error reported by the tree structures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input leaf array was empty.
    #[error("input array cannot be empty")]
    EmptyInput,

    /// A tree was requested with zero leaf capacity.
    #[error("capacity cannot be zero")]
    ZeroCapacity,

    /// The input leaf array does not fit the declared capacity.
    #[error("input of length {len} exceeds tree capacity {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    /// A query or update addressed a leaf outside `0..len`.
    #[error("position {pos} out of bounds for {len} leaves")]
    PositionOutOfBounds { pos: usize, len: usize },

    /// A range query was not a valid closed sub-range of the leaves.
    #[error("invalid query range [{l}, {r}] for {len} leaves")]
    InvalidRange { l: usize, r: usize, len: usize },

    /// An operation other than `build` was called before construction.
    #[error("tree has not been constructed")]
    NotConstructed,

    /// `build` was called a second time.
    #[error("tree has already been constructed")]
    AlreadyConstructed,

    /// An arrow list handed to [`crate::ArrowTree`] was not ascending.
    #[error("arrow list at leaf {leaf} is not sorted ascending")]
    UnsortedArrows { leaf: usize },
}
