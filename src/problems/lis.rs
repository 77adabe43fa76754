//! Longest strictly increasing subsequence via the cordon scheduler.

use crate::config::SolverConfig;
use crate::cordon::longest_chain;
use crate::order::{Comparator, NaturalOrder};

/// Length of the longest strictly increasing subsequence of `data`.
///
/// ```
/// use cordon_dp::solve_lis;
///
/// assert_eq!(solve_lis(&[3, 1, 4, 1, 5, 9, 2, 6]), 4);
/// assert_eq!(solve_lis::<i32>(&[]), 0);
/// ```
pub fn solve_lis<T>(data: &[T]) -> usize
where
    T: Clone + Ord + Send + Sync,
{
    solve_lis_with(data, SolverConfig::default())
}

/// [`solve_lis`] with an explicit configuration.
pub fn solve_lis_with<T>(data: &[T], cfg: SolverConfig) -> usize
where
    T: Clone + Ord + Send + Sync,
{
    longest_chain(data, NaturalOrder, |a: &T, b: &T| a < b, cfg)
}

/// Longest chain under a caller-supplied strict order.
///
/// The comparator drives both the finalization order and the chain
/// predicate, so `order.less(a, b)` must be a strict order on the data.
///
/// ```
/// use cordon_dp::{solve_lis_by, SolverConfig};
///
/// // Longest strictly decreasing subsequence.
/// let len = solve_lis_by(
///     &[5, 1, 4, 3, 2],
///     |a: &i32, b: &i32| a > b,
///     SolverConfig::default(),
/// );
/// assert_eq!(len, 4);
/// ```
pub fn solve_lis_by<T, C>(data: &[T], order: C, cfg: SolverConfig) -> usize
where
    T: Clone + PartialEq + Send + Sync,
    C: Comparator<T> + Clone + Sync,
{
    let chain = order.clone();
    longest_chain(data, order, move |a: &T, b: &T| chain.less(a, b), cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sequences() {
        assert_eq!(solve_lis(&[10, 22, 9, 33, 21, 50, 41, 60, 80]), 6);
        assert_eq!(solve_lis(&[5, 4, 3, 2, 1]), 1);
        assert_eq!(solve_lis(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(solve_lis(&[7]), 1);
        assert_eq!(solve_lis::<u8>(&[]), 0);
    }

    #[test]
    fn duplicates_do_not_chain() {
        assert_eq!(solve_lis(&[2, 2, 2, 2]), 1);
        assert_eq!(solve_lis(&[1, 3, 3, 5]), 3);
    }

    #[test]
    fn works_on_strings() {
        let words = ["apple", "banana", "avocado", "cherry", "fig"];
        assert_eq!(solve_lis(&words), 4);
    }
}
