//! Generic worker-pool dispatch shared by the tournament and sweep drivers.
//!
//! Both drivers run independent battles — no shared unit state, per
//! `SPEC_FULL.md` §5 — so the pool is a thin `rayon` fan-out with a shared,
//! mutex-guarded progress counter rather than anything battle-aware.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

/// Run `work` once per item in `items`, across a pool of `worker_count`
/// threads, and collect the results in input order.
///
/// `worker_count` of `0` lets `rayon` pick its own default. A dedicated
/// `ThreadPoolBuilder` is used (rather than the global pool) so concurrent
/// calls from tests don't fight over `build_global`.
pub fn run_parallel<T, R, F>(items: Vec<T>, worker_count: usize, work: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    let total = items.len();
    let progress = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let mut builder = rayon::ThreadPoolBuilder::new();
    if worker_count > 0 {
        builder = builder.num_threads(worker_count);
    }
    let pool = builder.build().expect("thread pool parameters are always valid here");

    pool.install(move || {
        items
            .into_par_iter()
            .map(move |item| {
                let result = work(item);
                let done = progress.fetch_add(1, Ordering::Relaxed) + 1;
                if done % 100 == 0 || done as usize == total {
                    debug!(done, total, elapsed_secs = start.elapsed().as_secs_f64(), "batch progress");
                }
                result
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_order() {
        let items: Vec<u32> = (0..50).collect();
        let results = run_parallel(items, 4, |x| x * 2);
        let expected: Vec<u32> = (0..50).map(|x| x * 2).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn zero_worker_count_uses_pool_default() {
        let items = vec![1, 2, 3];
        let results = run_parallel(items, 0, |x| x + 1);
        assert_eq!(results, vec![2, 3, 4]);
    }
}
