//! Convex segmentation costs (GLWS) via the interval-decision cordon
//! scheduler.
//!
//! Solves `D[0] = 0`, `D[i] = min over j < i of D[j] + cost(j, i)` for a
//! convex cost function, where `cost(j, i)` prices the segment `(j, i]` of
//! the input. Convexity here means decision monotonicity: if a later state
//! prefers predecessor `j`, no earlier state prefers a predecessor after
//! `j`. That licenses the divide-and-conquer decision recomputation in
//! [`find_intervals`].
//!
//! Unlike the label-chain problems, the frontier moves in blocks. The
//! decision list `B` records, for every state past the frontier, its best
//! predecessor among the finalized states, and the cordon is the first
//! state whose recorded cost could still be beaten by a not-yet-finalized
//! predecessor. Everything between the frontier and the cordon is settled
//! in one parallel sweep, then `B` is rebuilt for the remaining states.

use std::ops::Add;

use num_traits::{Bounded, Zero};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::utils::maybe_join;
#[cfg(feature = "parallel")]
use crate::utils::RELAX_CHUNK;

/// Size threshold above which the interval search forks into tasks.
const FORK_THRESHOLD: usize = 20;

/// One entry of the decision list: states `l..=r` currently take
/// `decision` as their best finalized predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalDecision {
    pub l: usize,
    pub r: usize,
    pub decision: usize,
}

/// Minimum total segmentation cost of `data` under `cost`.
///
/// `cost(j, i, data)` prices the segment `(j, i]` and must be evaluable
/// for any `j < i` independent of call order. Returns zero for empty or
/// single-element input.
///
/// ```
/// use cordon_dp::solve_glws;
///
/// // Squared-gap segmentation over sorted positions.
/// let total = solve_glws(&[0i64, 3, 4, 10], |j, i, data: &[i64]| {
///     let gap = data[i] - data[j];
///     gap * gap
/// });
/// assert_eq!(total, 46);
/// ```
pub fn solve_glws<T, F>(data: &[T], cost: F) -> T
where
    T: Copy + PartialOrd + Add<Output = T> + Zero + Bounded + Send + Sync,
    F: Fn(usize, usize, &[T]) -> T + Sync,
{
    solve_glws_with(data, cost, SolverConfig::default())
}

/// [`solve_glws`] with an explicit configuration.
pub fn solve_glws_with<T, F>(data: &[T], cost: F, cfg: SolverConfig) -> T
where
    T: Copy + PartialOrd + Add<Output = T> + Zero + Bounded + Send + Sync,
    F: Fn(usize, usize, &[T]) -> T + Sync,
{
    let n = data.len();
    if n == 0 {
        return T::zero();
    }

    #[cfg(feature = "tracing")]
    let span = tracing::debug_span!("solve_glws", states = n);
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let mut d = vec![T::max_value(); n];
    d[0] = T::zero();

    // Every state's best known predecessor starts as state 0.
    let mut decisions = if n > 1 {
        vec![IntervalDecision {
            l: 1,
            r: n - 1,
            decision: 0,
        }]
    } else {
        Vec::new()
    };

    let mut now = 0usize;
    while now < n - 1 {
        let cordon = find_cordon(now, &d, &decisions, &cost, data);

        settle_span(&mut d, &decisions, now, cordon, &cost, data, &cfg);

        if cordon < n {
            update_best(&mut decisions, cordon, n, &d, &cost, data, &cfg);
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(now, cordon, "frontier advanced");

        // The cordon is at least two past the frontier, so this always
        // makes progress.
        now = cordon - 1;
    }

    d[n - 1]
}

/// First state past `now` whose recorded cost an unfinalized predecessor
/// could still improve, or `n` when no such state exists.
///
/// Doubling search: widen the examined window `(now, now + 2^t]` until the
/// best improvement candidate lies inside it. For each window state `j`,
/// its recorded cost is exact (every state before the first improvable one
/// is already optimal), so scanning forward for the first state that would
/// rather use `j` yields a sound candidate; the minimum over the window is
/// exact once it falls within the scanned range.
fn find_cordon<T, F>(
    now: usize,
    d: &[T],
    decisions: &[IntervalDecision],
    cost: &F,
    data: &[T],
) -> usize
where
    T: Copy + PartialOrd + Add<Output = T>,
    F: Fn(usize, usize, &[T]) -> T,
{
    let n = d.len();
    let mut candidate = n;
    let mut scanned = now;
    let mut width = 1usize;

    loop {
        let r = (now + width).min(n - 1);
        for j in scanned + 1..=r {
            let dec_j = decision_for(decisions, j);
            let d_j = d[dec_j] + cost(dec_j, j, data);
            for i in j + 1..candidate.min(n) {
                let dec_i = decision_for(decisions, i);
                let recorded = d[dec_i] + cost(dec_i, i, data);
                if d_j + cost(j, i, data) < recorded {
                    candidate = i;
                    break;
                }
            }
        }
        scanned = r;
        if candidate <= r || r == n - 1 {
            return candidate;
        }
        width *= 2;
    }
}

/// Finalize states `(now, cordon)` at their recorded decisions.
fn settle_span<T, F>(
    d: &mut [T],
    decisions: &[IntervalDecision],
    now: usize,
    cordon: usize,
    cost: &F,
    data: &[T],
    cfg: &SolverConfig,
) where
    T: Copy + PartialOrd + Add<Output = T> + Send + Sync,
    F: Fn(usize, usize, &[T]) -> T + Sync,
{
    // Recorded decisions all point at finalized states, which live in the
    // head half of the split.
    let (head, tail) = d.split_at_mut(now + 1);
    let span = &mut tail[..cordon - now - 1];
    let head = &*head;

    let settle = |i: usize, slot: &mut T| {
        let dec = decision_for(decisions, i);
        let settled = head[dec] + cost(dec, i, data);
        if settled < *slot {
            *slot = settled;
        }
    };

    let fork = cfg.parallel && cfg!(feature = "parallel");
    if fork {
        #[cfg(feature = "parallel")]
        {
            span.par_iter_mut()
                .with_min_len(RELAX_CHUNK)
                .enumerate()
                .for_each(|(k, slot)| settle(now + 1 + k, slot));
            return;
        }
    }
    for (k, slot) in span.iter_mut().enumerate() {
        settle(now + 1 + k, slot);
    }
}

/// Decision recorded for state `i`.
fn decision_for(decisions: &[IntervalDecision], i: usize) -> usize {
    let idx = decisions.partition_point(|iv| iv.l <= i);
    debug_assert!(idx > 0, "state {i} below the decision list");
    let entry = &decisions[idx - 1];
    debug_assert!(entry.l <= i && i <= entry.r, "decision list has a gap at {i}");
    entry.decision
}

/// Best predecessor for state `i` among candidates `jl..=jr`, first on
/// ties.
fn best_decision<T, F>(jl: usize, jr: usize, i: usize, d: &[T], cost: &F, data: &[T]) -> usize
where
    T: Copy + PartialOrd + Add<Output = T>,
    F: Fn(usize, usize, &[T]) -> T,
{
    let mut best_j = jl;
    let mut best_value = d[jl] + cost(jl, i, data);
    for j in jl + 1..=jr {
        let value = d[j] + cost(j, i, data);
        if value < best_value {
            best_value = value;
            best_j = j;
        }
    }
    best_j
}

/// Optimal decisions for states `il..=ir` over candidates `jl..=jr`.
///
/// Bisects the state range, scans every candidate for the midpoint's best
/// predecessor, then recurses left with candidates at or before it and
/// right with candidates at or after it. Decision monotonicity makes the
/// restricted candidate ranges exhaustive.
#[allow(clippy::too_many_arguments)]
fn find_intervals<T, F>(
    jl: usize,
    jr: usize,
    il: usize,
    ir: usize,
    d: &[T],
    cost: &F,
    data: &[T],
    cfg: &SolverConfig,
) -> Vec<IntervalDecision>
where
    T: Copy + PartialOrd + Add<Output = T> + Send + Sync,
    F: Fn(usize, usize, &[T]) -> T + Sync,
{
    if il > ir {
        return Vec::new();
    }
    if il == ir {
        return vec![IntervalDecision {
            l: il,
            r: ir,
            decision: best_decision(jl, jr, il, d, cost, data),
        }];
    }

    let im = (il + ir) / 2;
    let best = best_decision(jl, jr, im, d, cost, data);

    let fork = cfg.parallel && ir - il > FORK_THRESHOLD;
    let (mut left, right) = maybe_join(
        fork,
        || find_intervals(jl, best, il, im - 1, d, cost, data, cfg),
        || find_intervals(best, jr, im + 1, ir, d, cost, data, cfg),
    );

    left.push(IntervalDecision {
        l: im,
        r: im,
        decision: best,
    });
    left.extend(right);
    left
}

/// Rebuild the decision list after the frontier jumped to `cordon`.
///
/// Fresh intervals cover `[cordon, n)` with the best decision over every
/// finalized candidate; old intervals entirely below the cordon survive
/// unchanged; adjacent same-decision intervals are compacted.
#[allow(clippy::too_many_arguments)]
fn update_best<T, F>(
    decisions: &mut Vec<IntervalDecision>,
    cordon: usize,
    n: usize,
    d: &[T],
    cost: &F,
    data: &[T],
    cfg: &SolverConfig,
) where
    T: Copy + PartialOrd + Add<Output = T> + Send + Sync,
    F: Fn(usize, usize, &[T]) -> T + Sync,
{
    let fresh = find_intervals(0, cordon - 1, cordon, n - 1, d, cost, data, cfg);

    let mut merged: Vec<IntervalDecision> = decisions
        .iter()
        .copied()
        .filter(|iv| iv.r < cordon)
        .collect();
    merged.extend(fresh);

    let mut compact: Vec<IntervalDecision> = Vec::with_capacity(merged.len());
    for iv in merged {
        match compact.last_mut() {
            Some(last) if last.decision == iv.decision && iv.l == last.r + 1 => {
                last.r = iv.r;
            }
            _ => compact.push(iv),
        }
    }
    *decisions = compact;
}
