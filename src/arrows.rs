//! Arrow-list segment tree with a parallel prefix-min sweep.
//!
//! Built for the round-based subsequence matching path: leaf `i` owns a
//! strictly ascending list of "arrow" targets and a cursor into it, and the
//! leaf's tree value is the first unconsumed arrow (or the sentinel once the
//! list is drained). One [`ArrowTree::prefix_min_advance`] call performs a
//! whole round: every leaf consumes all arrows at or below the running
//! minimum of the leaves to its left, computed in a single root-to-leaves
//! descent.
//!
//! The descent exploits the tree structure instead of a serial scan. A
//! subtree whose minimum already exceeds its incoming bound is skipped
//! outright. When both children must be visited, the right child's bound is
//! the left child's value captured before the left side mutates, so the two
//! halves can run as independent fork-join tasks.

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::order::NaturalOrder;
use crate::tree::{build_rec, lc, rc};
use crate::utils::{maybe_join, SharedCells};

/// Segment tree over per-leaf arrow lists.
#[derive(Debug)]
pub struct ArrowTree<T> {
    tree: Vec<T>,
    now: Vec<usize>,
    arrows: Vec<Vec<T>>,
    n: usize,
    infinity: T,
    cfg: SolverConfig,
}

impl<T> ArrowTree<T>
where
    T: Clone + Ord + Send + Sync,
{
    /// Build a tree over `arrows`; each inner list must be strictly
    /// ascending.
    pub fn new(arrows: Vec<Vec<T>>, infinity: T, cfg: SolverConfig) -> Result<Self> {
        if arrows.is_empty() {
            return Err(Error::EmptyInput);
        }
        for (leaf, ys) in arrows.iter().enumerate() {
            let sorted = ys.windows(2).all(|w| w[0] < w[1]);
            if !sorted || ys.last().is_some_and(|y| *y >= infinity) {
                return Err(Error::UnsortedArrows { leaf });
            }
        }

        let n = arrows.len();
        let leaves: Vec<T> = arrows
            .iter()
            .map(|ys| ys.first().cloned().unwrap_or_else(|| infinity.clone()))
            .collect();

        let mut tree = vec![infinity.clone(); 4 * n];
        let cells = SharedCells::new(&mut tree);
        build_rec(cells, &leaves, &NaturalOrder, &infinity, &cfg, 0, 0, n - 1);

        Ok(Self {
            tree,
            now: vec![0; n],
            arrows,
            n,
            infinity,
            cfg,
        })
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Smallest live arrow across all leaves (the root value).
    pub fn global_min(&self) -> &T {
        &self.tree[0]
    }

    /// True once every arrow list has been drained.
    pub fn is_exhausted(&self) -> bool {
        self.tree[0] == self.infinity
    }

    /// Cursor position of leaf `i`, for invariant checks.
    pub fn cursor(&self, i: usize) -> Result<usize> {
        if i >= self.n {
            return Err(Error::PositionOutOfBounds { pos: i, len: self.n });
        }
        Ok(self.now[i])
    }

    /// Run one prefix-min round over all leaves.
    ///
    /// Leaf `i` advances its cursor past every arrow at or below the
    /// minimum pre-round value among leaves `0..i` (the leftmost leaf's
    /// bound is the sentinel, so it drains everything it still holds
    /// whenever it is on the descent path). Cursors never move backwards.
    pub fn prefix_min_advance(&mut self) {
        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!("prefix_min_round", leaves = self.n);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let tree = SharedCells::new(&mut self.tree);
        let now = SharedCells::new(&mut self.now);
        prefix_min_rec(
            tree,
            now,
            &self.arrows,
            &self.infinity,
            &self.cfg,
            0,
            0,
            self.n - 1,
            &self.infinity,
        );
    }
}

/// How far past the cursor the leaf probes before switching from a linear
/// scan to binary search.
const LOOK_AHEAD: usize = 8;

#[allow(clippy::too_many_arguments)]
fn prefix_min_rec<T>(
    tree: SharedCells<'_, T>,
    now: SharedCells<'_, usize>,
    arrows: &[Vec<T>],
    infinity: &T,
    cfg: &SolverConfig,
    x: usize,
    l: usize,
    r: usize,
    pre: &T,
) where
    T: Clone + Ord + Send + Sync,
{
    // Nothing at or below the bound in this subtree.
    // SAFETY: reads of node x happen before any task forked below mutates
    // it, and sibling tasks never share nodes.
    if unsafe { tree.get(x) } > pre {
        return;
    }

    if l == r {
        let ys = &arrows[l];
        // SAFETY: leaf l belongs to exactly one descent task.
        let cursor = unsafe { now.get_mut(l) };
        let probe = *cursor + LOOK_AHEAD;
        if probe >= ys.len() || ys[probe] > *pre {
            while *cursor < ys.len() && ys[*cursor] <= *pre {
                *cursor += 1;
            }
        } else {
            *cursor += ys[*cursor..].partition_point(|y| y <= pre);
        }
        let value = if *cursor < ys.len() {
            ys[*cursor].clone()
        } else {
            infinity.clone()
        };
        unsafe { *tree.get_mut(x) = value };
        return;
    }

    let mid = (l + r) / 2;
    // SAFETY: child nodes are stable until their subtree task runs.
    let here = unsafe { tree.get(x).clone() };
    let left = unsafe { tree.get(lc(x)).clone() };
    let right = unsafe { tree.get(rc(x)).clone() };

    if here == right {
        if left <= *pre && left < *infinity {
            // The right half's bound is the left child's pre-round value,
            // captured above, so both halves are independent.
            maybe_join(
                cfg.fork(r - l),
                || prefix_min_rec(tree, now, arrows, infinity, cfg, lc(x), l, mid, pre),
                || prefix_min_rec(tree, now, arrows, infinity, cfg, rc(x), mid + 1, r, &left),
            );
        } else {
            prefix_min_rec(tree, now, arrows, infinity, cfg, rc(x), mid + 1, r, pre);
        }
    } else {
        prefix_min_rec(tree, now, arrows, infinity, cfg, lc(x), l, mid, pre);
    }

    // SAFETY: both subtree tasks joined; node x is exclusive again.
    unsafe {
        let winner = std::cmp::min(tree.get(lc(x)), tree.get(rc(x))).clone();
        *tree.get_mut(x) = winner;
    }
}
