//! Determinism testing harness.
//!
//! Provides a run-twice-and-compare harness for verifying that
//! `(scenario, seed)` reproducibility (`SPEC_FULL.md` §5, §8) actually holds,
//! plus a scoped-thread variant for catching non-determinism that only shows
//! up under concurrent execution.
//!
//! # Sources of non-determinism this guards against
//!
//! - **HashMap iteration order**: the tick loop shuffles live units through
//!   [`bg_core::engine::Engine::shuffled_live_units`] rather than iterating a
//!   hasher-randomized collection directly.
//! - **Unseeded randomness**: every RNG used in scenario construction or
//!   strategy selection is seeded from the battle's own seed
//!   (`bg_core::scenario::rng_for_seed`); nothing reaches for a process-global
//!   source.
//! - **Floating-point**: positions are ordinary `f64`, deterministic within
//!   one process for a fixed instruction sequence (cross-machine bit-for-bit
//!   replay is explicitly out of scope; see `DESIGN.md` deviation #1).

use std::thread;

use bg_core::battle::{run, Pacing};
use bg_core::result::{BattleResult, BattleWinner};
use bg_core::scenario::Scenario;

/// The subset of a [`BattleResult`] that two deterministic runs must agree
/// on: ticks elapsed, the winner, and each side's survivor/casualty counts.
/// Narrower than comparing the whole struct field-by-field, and avoids
/// requiring `BattleResult` itself to derive `PartialEq`/`Hash` for a
/// test-only concern.
pub type BattleFingerprint = (u64, BattleWinner, u32, u32, u32, u32);

/// Reduce a [`BattleResult`] to its [`BattleFingerprint`].
#[must_use]
pub fn fingerprint(result: &BattleResult) -> BattleFingerprint {
    (
        result.ticks,
        result.winner,
        result.team_a.survivor_count,
        result.team_a.casualties,
        result.team_b.survivor_count,
        result.team_b.casualties,
    )
}

/// Result of running the same setup multiple times and fingerprinting each.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether every run produced an identical fingerprint.
    pub is_deterministic: bool,
    /// The fingerprint from each run, in run order.
    pub fingerprints: Vec<BattleFingerprint>,
}

impl DeterminismResult {
    /// Distinct fingerprints observed (should be exactly 1).
    #[must_use]
    pub fn unique_fingerprints(&self) -> Vec<BattleFingerprint> {
        let mut unique = self.fingerprints.clone();
        unique.sort_by_key(|f| (f.0, f.2, f.3, f.4, f.5));
        unique.dedup();
        unique
    }

    /// Assert every run agreed, with a detailed message on failure.
    ///
    /// # Panics
    ///
    /// Panics if any run's fingerprint differs from the others.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            panic!(
                "battle is non-deterministic!\nruns: {}\nunique fingerprints: {:?}\nall fingerprints: {:?}",
                self.fingerprints.len(),
                self.unique_fingerprints(),
                self.fingerprints
            );
        }
    }
}

/// Run `setup` (which must itself be seeded, per `bg_core::scenario::rng_for_seed`)
/// `runs` times, running each resulting scenario to completion, and verify
/// every run produced an identical fingerprint.
pub fn verify_determinism<Setup>(runs: usize, setup: Setup) -> DeterminismResult
where
    Setup: Fn() -> Scenario,
{
    let mut fingerprints = Vec::with_capacity(runs);
    for _ in 0..runs {
        let scenario = setup();
        let result = run(scenario, Pacing::Unlocked, None, None);
        fingerprints.push(fingerprint(&result));
    }

    let is_deterministic = fingerprints.windows(2).all(|w| w[0] == w[1]);
    DeterminismResult { is_deterministic, fingerprints }
}

/// Like [`verify_determinism`], but runs `num_battles` battles concurrently
/// via scoped threads, to catch non-determinism that only manifests under
/// thread scheduling variation.
///
/// `setup` must be `Sync` since it is called from multiple threads.
pub fn verify_determinism_under_concurrency<Setup>(num_battles: usize, setup: Setup) -> DeterminismResult
where
    Setup: Fn() -> Scenario + Sync,
{
    let fingerprints = thread::scope(|scope| {
        let handles: Vec<_> = (0..num_battles)
            .map(|_| {
                scope.spawn(|| {
                    let scenario = setup();
                    let result = run(scenario, Pacing::Unlocked, None, None);
                    fingerprint(&result)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().expect("battle thread panicked")).collect()
    });

    let is_deterministic: bool = {
        let fps: &Vec<BattleFingerprint> = &fingerprints;
        fps.windows(2).all(|w| w[0] == w[1])
    };
    DeterminismResult { is_deterministic, fingerprints }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::lanchester_scenario;
    use bg_core::unit::UnitType;

    #[test]
    fn same_seed_is_deterministic_across_runs() {
        let result = verify_determinism(5, || lanchester_scenario(UnitType::Knight, 5, 42));
        result.assert_deterministic();
        assert_eq!(result.unique_fingerprints().len(), 1);
    }

    #[test]
    fn same_seed_is_deterministic_under_concurrency() {
        let result = verify_determinism_under_concurrency(8, || lanchester_scenario(UnitType::Crossbowman, 10, 7));
        result.assert_deterministic();
    }

    #[test]
    fn different_seeds_may_diverge() {
        let a = run(lanchester_scenario(UnitType::Knight, 5, 1), Pacing::Unlocked, None, None);
        let b = run(lanchester_scenario(UnitType::Knight, 5, 2), Pacing::Unlocked, None, None);
        // Not asserting divergence (a coincidental match is possible); this
        // just exercises fingerprinting two independently-seeded runs.
        let _ = (fingerprint(&a), fingerprint(&b));
    }
}
