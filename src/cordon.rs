//! The round-based cordon scheduler for longest-chain recurrences.
//!
//! A *cordon* is the globally smallest not-yet-finalized state under the
//! ordering comparator. Its label can no longer improve: any state that
//! could extend into it would have to be smaller, and every smaller state
//! is already finalized. Each round therefore extracts the cordon from the
//! range-min tree, finalizes its label, and relaxes every remaining larger
//! state against it in one flat parallel sweep.
//!
//! The ordering comparator and the chain predicate are separate arguments:
//! the comparator decides *finalization order* (and must be consistent with
//! the predicate, i.e. `precedes(a, b)` implies `a` orders before `b`),
//! while the predicate decides which labels a finalized state may extend.
//! For plain increasing subsequences both are `<`; for pair chains the
//! order is lexicographic but the predicate requires strict growth in both
//! components.

use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::order::{Comparator, Key, KeyOrder};
use crate::tree::RangeMinTree;
#[cfg(feature = "parallel")]
use crate::utils::RELAX_CHUNK;

/// Length of the longest chain in `keys` under `precedes`, with
/// finalization driven by `order`.
///
/// A chain is a subsequence `k_1, k_2, ..` of `keys` (in index order) with
/// `precedes(k_t, k_{t+1})` for every step. Returns 0 for empty input.
pub fn longest_chain<T, C, P>(keys: &[T], order: C, precedes: P, cfg: SolverConfig) -> usize
where
    T: Clone + PartialEq + Send + Sync,
    C: Comparator<T> + Sync,
    P: Fn(&T, &T) -> bool + Sync,
{
    let n = keys.len();
    if n == 0 {
        return 0;
    }

    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!("longest_chain", states = n);
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let wrapped: Vec<Key<T>> = keys.iter().cloned().map(Key::Finite).collect();
    let mut tree = RangeMinTree::from_slice_by(&wrapped, Key::Infinity, KeyOrder(order), cfg)
        .expect("non-empty key array always builds");

    // Every state starts as a chain of length one.
    let labels: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(1)).collect();
    let mut finalized = vec![false; n];
    let mut best = 0u32;

    for _round in 0..n {
        let Some(cordon) = tree
            .find_min_index()
            .expect("tree was constructed above")
        else {
            break;
        };
        let label = labels[cordon].load(Ordering::Relaxed);

        relax_tail(keys, &labels, &finalized, &precedes, cordon, label, &cfg);

        finalized[cordon] = true;
        best = best.max(label);
        tree.remove(cordon)
            .expect("cordon index returned by the tree is in bounds");

        #[cfg(feature = "tracing")]
        tracing::trace!(round = _round, cordon, label, "cordon finalized");
    }

    best as usize
}

/// Relax all unfinalized states after the cordon against its final label.
///
/// Labels are atomic so the sweep can run as a flat data-parallel loop; the
/// cordon's own label is stable because only states before it could still
/// write to it, and those are all finalized.
#[allow(clippy::too_many_arguments)]
fn relax_tail<T, P>(
    keys: &[T],
    labels: &[AtomicU32],
    finalized: &[bool],
    precedes: &P,
    cordon: usize,
    label: u32,
    cfg: &SolverConfig,
) where
    T: Sync,
    P: Fn(&T, &T) -> bool + Sync,
{
    let extended = label + 1;
    let key = &keys[cordon];
    let fork = cfg.parallel && cfg!(feature = "parallel");

    if fork {
        #[cfg(feature = "parallel")]
        {
            (cordon + 1..keys.len())
                .into_par_iter()
                .with_min_len(RELAX_CHUNK)
                .for_each(|i| {
                    if !finalized[i] && precedes(key, &keys[i]) {
                        labels[i].fetch_max(extended, Ordering::Relaxed);
                    }
                });
            return;
        }
    }

    for i in cordon + 1..keys.len() {
        if !finalized[i] && precedes(key, &keys[i]) {
            labels[i].fetch_max(extended, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NaturalOrder;

    fn seq() -> SolverConfig {
        SolverConfig::sequential()
    }

    #[test]
    fn empty_input_has_no_chain() {
        let keys: [i64; 0] = [];
        assert_eq!(longest_chain(&keys, NaturalOrder, |a, b| a < b, seq()), 0);
    }

    #[test]
    fn increasing_chain_matches_known_answer() {
        let keys = [10i64, 22, 9, 33, 21, 50, 41, 60, 80];
        assert_eq!(longest_chain(&keys, NaturalOrder, |a, b| a < b, seq()), 6);
    }

    #[test]
    fn all_equal_keys_give_singleton_chains() {
        let keys = [7i64; 5];
        assert_eq!(longest_chain(&keys, NaturalOrder, |a, b| a < b, seq()), 1);
    }

    #[test]
    fn reversed_comparator_finds_decreasing_chain() {
        let keys = [5i64, 1, 4, 3, 2];
        let order = |a: &i64, b: &i64| a > b;
        assert_eq!(longest_chain(&keys, order, |a, b| a > b, seq()), 4);
    }

    #[test]
    fn pair_chain_requires_growth_in_both_components() {
        // States sorted by (first asc, second desc); only strictly
        // increasing pairs chain.
        let keys = [(0u32, 2u32), (1, 1), (2, 3), (3, 0)];
        let chain = longest_chain(
            &keys,
            NaturalOrder,
            |a: &(u32, u32), b: &(u32, u32)| a.0 < b.0 && a.1 < b.1,
            seq(),
        );
        assert_eq!(chain, 2);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let keys: Vec<i64> = (0..1200).map(|i| (i * 2654435761u64 as i64) % 997).collect();
        let serial = longest_chain(&keys, NaturalOrder, |a, b| a < b, seq());
        let cfg = SolverConfig::new().with_parallel(true).with_granularity(32);
        let parallel = longest_chain(&keys, NaturalOrder, |a, b| a < b, cfg);
        assert_eq!(serial, parallel);
    }
}
