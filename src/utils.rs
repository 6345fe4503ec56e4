//! Parallelism configuration shared by the batch kernels.

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// Batch kernels take this flag and use rayon parallel iterators only when
/// it is [`Parallelism::Parallel`]. Pool sizing happens in
/// [`run_with_threads`]; kernels never build pools themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    #[default]
    Sequential,
    Parallel,
}

impl Parallelism {
    /// Create from thread count semantics.
    ///
    /// - 0 = auto (parallel if the current rayon pool has more than one thread)
    /// - 1 = sequential
    /// - >1 = parallel
    #[inline]
    pub fn from_threads(n_threads: usize) -> Self {
        if n_threads == 1 || (n_threads == 0 && rayon::current_num_threads() == 1) {
            Parallelism::Sequential
        } else {
            Parallelism::Parallel
        }
    }

    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }
}

// =============================================================================
// Thread Pool Setup
// =============================================================================

/// Run `f` under a pool sized for `n_threads`.
///
/// - `0` runs on the global rayon pool.
/// - `1` runs sequentially on the calling thread.
/// - `n > 1` installs a dedicated pool of exactly `n` threads.
///
/// # Example
///
/// ```
/// use boosters_objectives::utils::{run_with_threads, Parallelism};
///
/// let parallelism = run_with_threads(1, |p| p).unwrap();
/// assert_eq!(parallelism, Parallelism::Sequential);
/// ```
pub fn run_with_threads<T: Send>(
    n_threads: usize,
    f: impl FnOnce(Parallelism) -> T + Send,
) -> Result<T, rayon::ThreadPoolBuildError> {
    let parallelism = Parallelism::from_threads(n_threads);

    match (parallelism, n_threads) {
        (Parallelism::Sequential, _) => Ok(f(Parallelism::Sequential)),
        (Parallelism::Parallel, 0) => Ok(f(Parallelism::Parallel)),
        (Parallelism::Parallel, n) => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            log::debug!("running with a dedicated pool of {n} threads");
            Ok(pool.install(|| f(Parallelism::Parallel)))
        }
    }
}
