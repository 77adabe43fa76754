//! Parallel "cordon algorithm" solvers for pointer-chasing DP recurrences.
//!
//! This crate solves Longest Increasing Subsequence (LIS), Longest Common
//! Subsequence (LCS) and convex line-weighted segmentation (GLWS) by
//! repeatedly discovering the globally smallest not-yet-finalized state —
//! the *cordon* — and fanning out its relaxation to all larger states in
//! parallel.
//!
//! ## Core idea
//! 1. Build a range-minimum tree over a key derived from the input.
//! 2. Each round, extract the global minimum unfinalized index, finalize
//!    it, and relax every larger state's label in parallel.
//! 3. Remove the finalized index from the tree and repeat until the tree
//!    is exhausted (its minimum reaches the infinity sentinel).
//!
//! ## Quick start
//! ```
//! use cordon_dp::solve_lis;
//!
//! let lis = solve_lis(&[10, 22, 9, 33, 21, 50, 41, 60, 80]);
//! assert_eq!(lis, 6);
//! ```
//!
//! ## Building blocks
//! - [`RangeMinTree`]: fork-join segment tree with parallel build, range
//!   minimum, point update/removal and min-index descent.
//! - [`ArrowTree`]: the LCS-specific prefix-min batch advance over
//!   per-row match lists ("arrows").
//! - [`LockFreeTournamentTree`]: a versioned-CAS tournament tree for
//!   genuinely concurrent multi-writer workloads.
//! - [`problems`]: the three solver entry points built on top.
//!
//! Parallel execution is gated behind the `parallel` feature (on by
//! default) and a per-call [`SolverConfig`]; every fork point falls back
//! to sequential execution below the configured granularity threshold.

pub mod arrows;
pub mod config;
pub mod cordon;
pub mod error;
pub mod order;
pub mod problems;
pub mod tournament;
pub mod tree;
pub mod utils;

pub use crate::arrows::ArrowTree;
pub use crate::config::SolverConfig;
pub use crate::error::{Error, Result};
pub use crate::order::{Comparator, Key, NaturalOrder};
pub use crate::problems::glws::{solve_glws, solve_glws_with};
pub use crate::problems::lcs::{solve_lcs, solve_lcs_with};
pub use crate::problems::lis::{solve_lis, solve_lis_by, solve_lis_with};
pub use crate::tournament::LockFreeTournamentTree;
pub use crate::tree::RangeMinTree;
