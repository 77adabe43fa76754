//! Comparators and the finite/infinity key wrapper used by the solvers.

use std::cmp::Ordering;

/// Strict-weak-order comparison used by [`crate::RangeMinTree`].
///
/// `less(a, b)` returns true when `a` should win a minimum against `b`.
/// Ties (neither less) are broken toward the left child by the tree.
pub trait Comparator<T> {
    fn less(&self, a: &T, b: &T) -> bool;

    /// Pick the winner of two candidates, preferring `a` on ties.
    #[inline]
    fn min<'a>(&self, a: &'a T, b: &'a T) -> &'a T {
        if self.less(b, a) {
            b
        } else {
            a
        }
    }
}

/// The natural `Ord`-based comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<T: Ord> Comparator<T> for NaturalOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// A key extended with an infinity sentinel that no real datum can equal.
///
/// The solvers store `Key<T>` in their trees so the removal sentinel is
/// unreachable by construction instead of relying on the caller to pick an
/// out-of-band value. The derived `Ord` places `Infinity` after every
/// finite key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key<T> {
    Finite(T),
    Infinity,
}

impl<T> Key<T> {
    #[inline]
    pub fn is_infinity(&self) -> bool {
        matches!(self, Key::Infinity)
    }
}

/// Lift a comparator on `T` to one on [`Key<T>`], keeping `Infinity` last.
#[derive(Debug, Clone, Copy)]
pub struct KeyOrder<C>(pub C);

impl<T, C: Comparator<T>> Comparator<Key<T>> for KeyOrder<C> {
    #[inline]
    fn less(&self, a: &Key<T>, b: &Key<T>) -> bool {
        match (a, b) {
            (Key::Finite(a), Key::Finite(b)) => self.0.less(a, b),
            (Key::Finite(_), Key::Infinity) => true,
            (Key::Infinity, _) => false,
        }
    }
}

impl<T: Ord> Key<T> {
    /// Total order matching `KeyOrder(NaturalOrder)`; handy in tests.
    pub fn cmp_natural(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_min_prefers_left_on_tie() {
        let cmp = NaturalOrder;
        let (a, b) = (3, 3);
        assert!(std::ptr::eq(cmp.min(&a, &b), &a));
        assert_eq!(*cmp.min(&2, &5), 2);
        assert_eq!(*cmp.min(&5, &2), 2);
    }

    #[test]
    fn closure_comparator_reverses() {
        let rev = |a: &i32, b: &i32| a > b;
        assert!(rev.less(&5, &2));
        assert_eq!(*rev.min(&5, &2), 5);
    }

    #[test]
    fn infinity_sorts_last() {
        assert!(Key::Finite(i64::MAX) < Key::Infinity);
        let cmp = KeyOrder(NaturalOrder);
        assert!(cmp.less(&Key::Finite(1), &Key::Infinity));
        assert!(!cmp.less(&Key::<i32>::Infinity, &Key::Infinity));
        assert!(!cmp.less(&Key::Infinity, &Key::Finite(1)));
    }
}
