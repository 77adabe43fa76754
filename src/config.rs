//! Solver configuration: parallelism switch and task granularity.

/// Default minimum subrange length before a recursion forks into tasks.
///
/// Task spawn overhead dominates below this size, so recursive operations
/// fall back to sequential execution for smaller subranges.
pub const DEFAULT_GRANULARITY: usize = 1000;

/// Per-call configuration shared by the trees and solvers.
///
/// ```
/// use cordon_dp::SolverConfig;
///
/// let cfg = SolverConfig::new().with_parallel(false);
/// assert!(!cfg.parallel);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// Whether recursive operations may fork into parallel tasks.
    ///
    /// Without the `parallel` cargo feature this flag has no effect.
    pub parallel: bool,
    /// Minimum subrange length for a fork point to actually fork.
    pub granularity: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            granularity: DEFAULT_GRANULARITY,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fully sequential execution, regardless of enabled features.
    pub fn sequential() -> Self {
        Self::new().with_parallel(false)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// # Panics
    /// Panics if `granularity == 0`.
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        assert!(granularity > 0, "granularity must be positive");
        self.granularity = granularity;
        self
    }

    /// True if a subrange of `len` elements should be processed in parallel.
    #[inline]
    pub(crate) fn fork(&self, len: usize) -> bool {
        self.parallel && len > self.granularity
    }
}
