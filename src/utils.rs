//! Fork-join helpers shared by the tree structures.

use std::marker::PhantomData;

/// Chunk size for the flat relaxation sweeps, roughly one cache line of
/// 32-bit labels, so neighbouring workers do not share a line.
pub(crate) const RELAX_CHUNK: usize = 16;

/// Run two closures, in parallel when `fork` is set and the `parallel`
/// feature is enabled, sequentially otherwise.
#[cfg(feature = "parallel")]
#[inline]
pub(crate) fn maybe_join<A, B, RA, RB>(fork: bool, a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    if fork {
        rayon::join(a, b)
    } else {
        (a(), b())
    }
}

#[cfg(not(feature = "parallel"))]
#[inline]
pub(crate) fn maybe_join<A, B, RA, RB>(_fork: bool, a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA,
    B: FnOnce() -> RB,
{
    (a(), b())
}

/// Shared mutable view of a slice for recursive fork-join tree traversals.
///
/// The heap-shaped tree array interleaves left and right subtrees, so
/// `split_at_mut` cannot hand each forked task its own subslice. Instead
/// both tasks share this raw view.
///
/// # Safety
/// Callers must guarantee that sibling tasks touch disjoint index sets and
/// that a parent only reads an index after joining the tasks that wrote it.
/// The tree traversals uphold this: a task spawned for node `x` writes only
/// nodes of `x`'s subtree (and leaf-cursor slots of `x`'s leaf range), and
/// subtrees of siblings are disjoint.
pub(crate) struct SharedCells<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for SharedCells<'_, T> {}
unsafe impl<T: Send> Sync for SharedCells<'_, T> {}

impl<T> Clone for SharedCells<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for SharedCells<'_, T> {}

impl<'a, T> SharedCells<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// No other task may hold a reference to index `i` at the same time.
    #[inline]
    pub(crate) unsafe fn get(&self, i: usize) -> &T {
        debug_assert!(i < self.len, "cell index {i} out of bounds ({})", self.len);
        &*self.ptr.add(i)
    }

    /// # Safety
    /// No other task may access index `i` at the same time.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn get_mut(&self, i: usize) -> &mut T {
        debug_assert!(i < self.len, "cell index {i} out of bounds ({})", self.len);
        &mut *self.ptr.add(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maybe_join_sequential_runs_both() {
        let (a, b) = maybe_join(false, || 1, || 2);
        assert_eq!((a, b), (1, 2));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn maybe_join_parallel_runs_both() {
        let (a, b) = maybe_join(true, || 1, || 2);
        assert_eq!((a, b), (1, 2));
    }

    #[test]
    fn shared_cells_disjoint_writes() {
        let mut data = vec![0u32; 8];
        let cells = SharedCells::new(&mut data);
        let (left, right) = maybe_join(
            cfg!(feature = "parallel"),
            || unsafe {
                for i in 0..4 {
                    *cells.get_mut(i) = i as u32;
                }
                *cells.get(3)
            },
            || unsafe {
                for i in 4..8 {
                    *cells.get_mut(i) = i as u32;
                }
                *cells.get(7)
            },
        );
        assert_eq!((left, right), (3, 7));
        assert_eq!(data, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    }
}
