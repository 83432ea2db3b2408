//! Battle benchmarks for bg_core.
//!
//! Run with: `cargo bench -p bg_core`

#![allow(missing_docs)]

use bg_core::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn run_lanchester(unit_type: UnitType, n: u32, seed: u64) -> BattleResult {
    let mut rng = bg_core::scenario::rng_for_seed(seed);
    let profile_a = StrategyName::Daft.build(&mut rng);
    let profile_b = StrategyName::Daft.build(&mut rng);
    let scenario = build_lanchester(unit_type, n, profile_a, profile_b, seed).expect("valid lanchester parameters");
    run(scenario, Pacing::Unlocked, None, None)
}

pub fn lanchester_melee_benchmark(c: &mut Criterion) {
    c.bench_function("lanchester_melee_n20", |b| {
        b.iter(|| black_box(run_lanchester(UnitType::Knight, 20, 0)))
    });
}

pub fn lanchester_ranged_benchmark(c: &mut Criterion) {
    c.bench_function("lanchester_ranged_n20", |b| {
        b.iter(|| black_box(run_lanchester(UnitType::Crossbowman, 20, 0)))
    });
}

pub fn classic_scenario_benchmark(c: &mut Criterion) {
    c.bench_function("classic_formation_n30", |b| {
        b.iter(|| {
            let mut rng = bg_core::scenario::rng_for_seed(0);
            let profile_a = StrategyName::SomeIq.build(&mut rng);
            let profile_b = StrategyName::SomeIq.build(&mut rng);
            let scenario = build(FormationTag::Classic, 30, profile_a, profile_b, 0).expect("valid scenario parameters");
            black_box(run(scenario, Pacing::Unlocked, None, None))
        })
    });
}

criterion_group!(benches, lanchester_melee_benchmark, lanchester_ranged_benchmark, classic_scenario_benchmark);
criterion_main!(benches);
