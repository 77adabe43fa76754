//! Fork-join range-minimum segment tree.
//!
//! A complete binary tree over a fixed leaf array, stored densely: node `x`
//! has children `2x + 1` and `2x + 2`, the root is node 0, and every
//! internal node holds the minimum of its subtree's live leaves. Removal
//! sets a leaf to the infinity sentinel, which excludes it from every
//! subsequent minimum query.
//!
//! Parallel build recursively splits the leaf range at its midpoint and
//! forks both halves only while the subrange is longer than the configured
//! granularity threshold. Point updates are strictly single-writer: the
//! cordon scheduler performs exactly one removal per round, so `&mut self`
//! is the right level of synchronization here. For genuinely concurrent
//! multi-writer workloads see [`crate::tournament`].

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::order::{Comparator, NaturalOrder};
use crate::utils::{maybe_join, SharedCells};

/// Range-minimum tree over `n` leaves of type `T` under comparator `C`.
#[derive(Debug)]
pub struct RangeMinTree<T, C = NaturalOrder> {
    tree: Vec<T>,
    n: usize,
    infinity: T,
    cmp: C,
    cfg: SolverConfig,
    constructed: bool,
}

#[inline]
pub(crate) fn lc(x: usize) -> usize {
    2 * x + 1
}

#[inline]
pub(crate) fn rc(x: usize) -> usize {
    2 * x + 2
}

impl<T> RangeMinTree<T, NaturalOrder>
where
    T: Clone + PartialEq + Send + Sync,
{
    /// Unconstructed tree with `capacity` leaves under the natural order.
    pub fn with_capacity(capacity: usize, infinity: T, cfg: SolverConfig) -> Result<Self>
    where
        T: Ord,
    {
        Self::with_capacity_by(capacity, infinity, NaturalOrder, cfg)
    }

    /// Build a tree directly from a leaf slice under the natural order.
    pub fn from_slice(leaves: &[T], infinity: T, cfg: SolverConfig) -> Result<Self>
    where
        T: Ord,
    {
        let mut tree = Self::with_capacity(leaves.len().max(1), infinity, cfg)?;
        tree.build(leaves)?;
        Ok(tree)
    }
}

impl<T, C> RangeMinTree<T, C>
where
    T: Clone + PartialEq + Send + Sync,
    C: Comparator<T> + Sync,
{
    /// Unconstructed tree with `capacity` leaves and an explicit comparator.
    ///
    /// The `infinity` sentinel must compare after every real datum under
    /// `cmp` and must never occur in the input.
    pub fn with_capacity_by(
        capacity: usize,
        infinity: T,
        cmp: C,
        cfg: SolverConfig,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        Ok(Self {
            // 4n is always enough for midpoint splitting on any n.
            tree: vec![infinity.clone(); 4 * capacity],
            n: capacity,
            infinity,
            cmp,
            cfg,
            constructed: false,
        })
    }

    /// Build a tree directly from a leaf slice with an explicit comparator.
    pub fn from_slice_by(leaves: &[T], infinity: T, cmp: C, cfg: SolverConfig) -> Result<Self> {
        let mut tree = Self::with_capacity_by(leaves.len().max(1), infinity, cmp, cfg)?;
        tree.build(leaves)?;
        Ok(tree)
    }

    /// Number of leaves the tree was declared with.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Bottom-up construction from `leaves`; may be called exactly once.
    ///
    /// Leaf slots past `leaves.len()` are padded with the sentinel. Fails
    /// before any task is spawned on empty input, on input exceeding the
    /// declared capacity, and on repeated construction.
    pub fn build(&mut self, leaves: &[T]) -> Result<()> {
        if self.constructed {
            return Err(Error::AlreadyConstructed);
        }
        if leaves.is_empty() {
            return Err(Error::EmptyInput);
        }
        if leaves.len() > self.n {
            return Err(Error::CapacityExceeded {
                len: leaves.len(),
                capacity: self.n,
            });
        }

        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!("range_min_build", leaves = leaves.len());
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let cells = SharedCells::new(&mut self.tree);
        build_rec(
            cells,
            leaves,
            &self.cmp,
            &self.infinity,
            &self.cfg,
            0,
            0,
            self.n - 1,
        );
        self.constructed = true;
        Ok(())
    }

    /// Minimum over the closed leaf range `[l, r]`.
    pub fn query_range(&self, l: usize, r: usize) -> Result<T> {
        self.ensure_constructed()?;
        if l > r || r >= self.n {
            return Err(Error::InvalidRange { l, r, len: self.n });
        }
        Ok(self.query_rec(0, 0, self.n - 1, l, r))
    }

    /// Current global minimum (the root value).
    pub fn global_min(&self) -> Result<&T> {
        self.ensure_constructed()?;
        Ok(&self.tree[0])
    }

    /// True once every leaf has been removed.
    pub fn is_exhausted(&self) -> bool {
        self.constructed && self.tree[0] == self.infinity
    }

    /// Leaf index of the global minimum, or `None` when exhausted.
    ///
    /// Descends from the root into whichever child carries the running
    /// minimum, preferring the left child on ties.
    pub fn find_min_index(&self) -> Result<Option<usize>> {
        self.ensure_constructed()?;
        if self.tree[0] == self.infinity {
            return Ok(None);
        }
        let mut x = 0;
        let (mut l, mut r) = (0, self.n - 1);
        while l < r {
            let mid = (l + r) / 2;
            debug_assert!(rc(x) < self.tree.len(), "child index escaped the tree");
            if self.cmp.less(&self.tree[rc(x)], &self.tree[lc(x)]) {
                x = rc(x);
                l = mid + 1;
            } else {
                x = lc(x);
                r = mid;
            }
        }
        Ok(Some(l))
    }

    /// Replace the leaf at `pos` and recompute its root path.
    pub fn update(&mut self, pos: usize, value: T) -> Result<()> {
        self.ensure_constructed()?;
        if pos >= self.n {
            return Err(Error::PositionOutOfBounds {
                pos,
                len: self.n,
            });
        }
        update_rec(&mut self.tree, &self.cmp, 0, 0, self.n - 1, pos, &value);
        Ok(())
    }

    /// Remove the leaf at `pos` by forcing it to the sentinel.
    ///
    /// Idempotent: removing the same position twice leaves the tree in the
    /// state produced by the first removal.
    pub fn remove(&mut self, pos: usize) -> Result<()> {
        self.ensure_constructed()?;
        if pos >= self.n {
            return Err(Error::PositionOutOfBounds {
                pos,
                len: self.n,
            });
        }
        let sentinel = self.infinity.clone();
        update_rec(&mut self.tree, &self.cmp, 0, 0, self.n - 1, pos, &sentinel);
        Ok(())
    }

    /// Raw node array, for invariant checks.
    pub fn nodes(&self) -> &[T] {
        &self.tree
    }

    fn ensure_constructed(&self) -> Result<()> {
        if self.constructed {
            Ok(())
        } else {
            Err(Error::NotConstructed)
        }
    }

    fn query_rec(&self, x: usize, l: usize, r: usize, ql: usize, qr: usize) -> T {
        if r < ql || l > qr {
            return self.infinity.clone();
        }
        if ql <= l && r <= qr {
            return self.tree[x].clone();
        }
        let mid = (l + r) / 2;
        let left = self.query_rec(lc(x), l, mid, ql, qr);
        let right = self.query_rec(rc(x), mid + 1, r, ql, qr);
        self.cmp.min(&left, &right).clone()
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn build_rec<T, C>(
    cells: SharedCells<'_, T>,
    leaves: &[T],
    cmp: &C,
    infinity: &T,
    cfg: &SolverConfig,
    x: usize,
    l: usize,
    r: usize,
) where
    T: Clone + Send + Sync,
    C: Comparator<T> + Sync,
{
    if l == r {
        let value = if l < leaves.len() {
            leaves[l].clone()
        } else {
            infinity.clone()
        };
        // SAFETY: each leaf is written by exactly one task (leaf ranges of
        // sibling tasks are disjoint).
        unsafe { *cells.get_mut(x) = value };
        return;
    }

    let mid = (l + r) / 2;
    maybe_join(
        cfg.fork(r - l),
        || build_rec(cells, leaves, cmp, infinity, cfg, lc(x), l, mid),
        || build_rec(cells, leaves, cmp, infinity, cfg, rc(x), mid + 1, r),
    );

    // SAFETY: both child tasks joined above; only this task touches node x.
    unsafe {
        let winner = cmp.min(cells.get(lc(x)), cells.get(rc(x))).clone();
        *cells.get_mut(x) = winner;
    }
}

fn update_rec<T, C>(tree: &mut [T], cmp: &C, x: usize, l: usize, r: usize, pos: usize, value: &T)
where
    T: Clone,
    C: Comparator<T>,
{
    if l == r {
        tree[x] = value.clone();
        return;
    }
    let mid = (l + r) / 2;
    if pos <= mid {
        update_rec(tree, cmp, lc(x), l, mid, pos, value);
    } else {
        update_rec(tree, cmp, rc(x), mid + 1, r, pos, value);
    }
    debug_assert!(rc(x) < tree.len(), "child index escaped the tree");
    let winner = cmp.min(&tree[lc(x)], &tree[rc(x)]).clone();
    tree[x] = winner;
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: i64 = i64::MAX;

    fn seq() -> SolverConfig {
        SolverConfig::sequential()
    }

    #[test]
    fn build_and_query_small() {
        let data = [5i64, 3, 8, 1, 9, 2];
        let tree = RangeMinTree::from_slice(&data, INF, seq()).unwrap();
        assert_eq!(*tree.global_min().unwrap(), 1);
        assert_eq!(tree.query_range(0, 5).unwrap(), 1);
        assert_eq!(tree.query_range(0, 2).unwrap(), 3);
        assert_eq!(tree.query_range(4, 5).unwrap(), 2);
        assert_eq!(tree.query_range(2, 2).unwrap(), 8);
    }

    #[test]
    fn empty_build_is_rejected() {
        let mut tree = RangeMinTree::with_capacity(4, INF, seq()).unwrap();
        assert_eq!(tree.build(&[]), Err(Error::EmptyInput));
    }

    #[test]
    fn oversized_build_is_rejected() {
        let mut tree = RangeMinTree::with_capacity(2, INF, seq()).unwrap();
        assert_eq!(
            tree.build(&[1, 2, 3]),
            Err(Error::CapacityExceeded {
                len: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            RangeMinTree::<i64>::with_capacity(0, INF, seq()).unwrap_err(),
            Error::ZeroCapacity
        );
    }

    #[test]
    fn operations_require_construction() {
        let tree = RangeMinTree::<i64>::with_capacity(4, INF, seq()).unwrap();
        assert_eq!(tree.query_range(0, 3), Err(Error::NotConstructed));
        assert_eq!(tree.find_min_index(), Err(Error::NotConstructed));
        assert!(!tree.is_exhausted());
    }

    #[test]
    fn build_is_single_shot() {
        let data = [2i64, 1];
        let mut tree = RangeMinTree::with_capacity(2, INF, seq()).unwrap();
        tree.build(&data).unwrap();
        assert_eq!(tree.build(&data), Err(Error::AlreadyConstructed));
    }

    #[test]
    fn min_index_ties_break_left() {
        let data = [4i64, 2, 2, 7];
        let tree = RangeMinTree::from_slice(&data, INF, seq()).unwrap();
        assert_eq!(tree.find_min_index().unwrap(), Some(1));
    }

    #[test]
    fn update_and_remove_single_path() {
        let data = [5i64, 3, 8, 1];
        let mut tree = RangeMinTree::from_slice(&data, INF, seq()).unwrap();
        assert_eq!(tree.find_min_index().unwrap(), Some(3));

        tree.remove(3).unwrap();
        assert_eq!(tree.find_min_index().unwrap(), Some(1));

        tree.update(0, -2).unwrap();
        assert_eq!(tree.find_min_index().unwrap(), Some(0));
        assert_eq!(*tree.global_min().unwrap(), -2);

        assert_eq!(
            tree.update(9, 0),
            Err(Error::PositionOutOfBounds { pos: 9, len: 4 })
        );
    }

    #[test]
    fn exhaustion_after_all_removed() {
        let data = [2i64, 1, 3];
        let mut tree = RangeMinTree::from_slice(&data, INF, seq()).unwrap();
        for pos in 0..3 {
            assert!(!tree.is_exhausted());
            tree.remove(pos).unwrap();
        }
        assert!(tree.is_exhausted());
        assert_eq!(tree.find_min_index().unwrap(), None);
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let data: Vec<i64> = (0..5000).map(|i| (i * 7919) % 1543).collect();
        let cfg = SolverConfig::new().with_parallel(true).with_granularity(64);
        let par = RangeMinTree::from_slice(&data, INF, cfg).unwrap();
        let ser = RangeMinTree::from_slice(&data, INF, seq()).unwrap();
        assert_eq!(par.global_min().unwrap(), ser.global_min().unwrap());
        assert_eq!(par.find_min_index().unwrap(), ser.find_min_index().unwrap());
        for (l, r) in [(0, 4999), (17, 350), (4000, 4999), (123, 123)] {
            assert_eq!(par.query_range(l, r).unwrap(), ser.query_range(l, r).unwrap());
        }
    }

    #[test]
    fn custom_comparator_flips_winner() {
        let data = [1i64, 9, 4];
        let greater = |a: &i64, b: &i64| a > b;
        let tree = RangeMinTree::from_slice_by(&data, i64::MIN, greater, seq()).unwrap();
        assert_eq!(tree.find_min_index().unwrap(), Some(1));
        assert_eq!(*tree.global_min().unwrap(), 9);
    }

    #[test]
    fn pair_keys_use_lexicographic_order() {
        let data = [(3u32, 1u32), (1, 5), (1, 2), (2, 0)];
        let tree = RangeMinTree::from_slice(&data, (u32::MAX, u32::MAX), seq()).unwrap();
        assert_eq!(tree.find_min_index().unwrap(), Some(2));
    }
}
