//! Longest common subsequence via matched-pair chains or arrow rounds.
//!
//! Both strategies start from the matched pairs `(i, j)` with
//! `a[i] == b[j]`. The pair strategy sorts them by row ascending and
//! column descending and hands them to the cordon scheduler with a
//! strict-in-both-coordinates chain predicate. The arrow strategy keeps
//! the pairs as per-row ascending column lists and counts prefix-min
//! rounds on an [`ArrowTree`]; each round consumes exactly the pairs of
//! one antichain frontier, so the round count is the answer.
//!
//! The pair strategy relaxes O(m²) edges over m matched pairs, the arrow
//! strategy is near-linear per round, so [`solve_lcs`] dispatches on the
//! number of matches.

use std::collections::HashMap;
use std::hash::Hash;

use crate::arrows::ArrowTree;
use crate::config::SolverConfig;
use crate::cordon::longest_chain;
use crate::order::NaturalOrder;

/// Match count above which [`solve_lcs_with`] switches from the pair
/// chain strategy to arrow rounds.
const PAIRS_CUTOFF: usize = 2048;

/// Length of the longest common subsequence of `a` and `b`.
///
/// ```
/// use cordon_dp::solve_lcs;
///
/// assert_eq!(solve_lcs(b"ABCBDAB", b"BDCABA"), 4);
/// assert_eq!(solve_lcs(&[1, 2, 3, 4, 5], &[3, 1, 4, 2, 5]), 3);
/// ```
pub fn solve_lcs<T>(a: &[T], b: &[T]) -> usize
where
    T: Eq + Hash + Send + Sync,
{
    solve_lcs_with(a, b, SolverConfig::default())
}

/// [`solve_lcs`] with an explicit configuration; picks a strategy by
/// match count.
pub fn solve_lcs_with<T>(a: &[T], b: &[T], cfg: SolverConfig) -> usize
where
    T: Eq + Hash + Send + Sync,
{
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let arrows = match_positions(a, b);
    let matches: usize = arrows.iter().map(Vec::len).sum();
    if matches <= PAIRS_CUTOFF {
        lcs_from_pairs(&arrows, cfg)
    } else {
        lcs_from_arrows(arrows, cfg)
    }
}

/// Force the matched-pair chain strategy.
pub fn solve_lcs_pairs<T>(a: &[T], b: &[T], cfg: SolverConfig) -> usize
where
    T: Eq + Hash + Send + Sync,
{
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    lcs_from_pairs(&match_positions(a, b), cfg)
}

/// Force the arrow-round strategy.
pub fn solve_lcs_arrows<T>(a: &[T], b: &[T], cfg: SolverConfig) -> usize
where
    T: Eq + Hash + Send + Sync,
{
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    lcs_from_arrows(match_positions(a, b), cfg)
}

/// Per-row ascending lists of matching column indices.
fn match_positions<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Vec<u32>> {
    let mut columns: HashMap<&T, Vec<u32>> = HashMap::new();
    for (j, y) in b.iter().enumerate() {
        columns.entry(y).or_default().push(j as u32);
    }
    a.iter()
        .map(|x| columns.get(x).cloned().unwrap_or_default())
        .collect()
}

fn lcs_from_pairs(arrows: &[Vec<u32>], cfg: SolverConfig) -> usize {
    // Row ascending, column descending, so equal rows can never chain
    // under the strict predicate and no explicit sort is needed.
    let mut states: Vec<(u32, u32)> = Vec::with_capacity(arrows.iter().map(Vec::len).sum());
    for (i, columns) in arrows.iter().enumerate() {
        for &j in columns.iter().rev() {
            states.push((i as u32, j));
        }
    }
    longest_chain(
        &states,
        NaturalOrder,
        |p: &(u32, u32), q: &(u32, u32)| p.0 < q.0 && p.1 < q.1,
        cfg,
    )
}

fn lcs_from_arrows(arrows: Vec<Vec<u32>>, cfg: SolverConfig) -> usize {
    let mut tree = ArrowTree::new(arrows, u32::MAX, cfg)
        .expect("per-row match lists are non-empty overall and ascending");
    let mut rounds = 0;
    while !tree.is_exhausted() {
        rounds += 1;
        tree.prefix_min_advance();
    }
    rounds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> SolverConfig {
        SolverConfig::sequential()
    }

    #[test]
    fn classic_pairs() {
        assert_eq!(solve_lcs(b"ABCBDAB", b"BDCABA"), 4);
        assert_eq!(solve_lcs(&[1, 2, 3, 4, 5], &[3, 1, 4, 2, 5]), 3);
    }

    #[test]
    fn empty_and_disjoint_inputs() {
        assert_eq!(solve_lcs::<u8>(b"", b"ABC"), 0);
        assert_eq!(solve_lcs::<u8>(b"ABC", b""), 0);
        assert_eq!(solve_lcs(b"ABC", b"XYZ"), 0);
    }

    #[test]
    fn identical_inputs() {
        assert_eq!(solve_lcs(b"GATTACA", b"GATTACA"), 7);
    }

    #[test]
    fn strategies_agree() {
        let a = b"XMJYAUZ";
        let b = b"MZJAWXU";
        let pairs = solve_lcs_pairs(a, b, seq());
        let arrows = solve_lcs_arrows(a, b, seq());
        assert_eq!(pairs, 4);
        assert_eq!(arrows, 4);
    }

    #[test]
    fn repeated_symbols() {
        assert_eq!(solve_lcs(b"AAAA", b"AA"), 2);
        assert_eq!(solve_lcs(b"ABAB", b"BABA"), 3);
    }
}
