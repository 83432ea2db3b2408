//! The battle runner: the single authority over the tick loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, info_span};

use crate::order::OrderManager;
use crate::result::{BattleResult, BattleWinner, TeamSummary};
use crate::scenario::Scenario;
use crate::unit::{Team, UnitId};

/// Cooperative cancellation handle: an external thread can call
/// [`StopFlag::stop`] and the runner checks it at the top of every tick.
#[derive(Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    /// A fresh, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the runner stop at the next tick boundary.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Cooperative pause handle: an external thread can toggle this and the
/// runner spins on it between ticks in timed mode.
#[derive(Clone, Default)]
pub struct PauseFlag(Arc<AtomicBool>);

impl PauseFlag {
    /// A fresh, unpaused flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pause or unpause.
    pub fn set(&self, paused: bool) {
        self.0.store(paused, Ordering::Relaxed);
    }

    fn is_paused(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Real-time pacing behavior for [`run`].
#[derive(Debug, Clone, Copy)]
pub enum Pacing {
    /// No sleeps; used by tournaments and parameter sweeps.
    Unlocked,
    /// Sleep `1 / tick_speed` seconds between ticks, honoring an external pause flag.
    Timed {
        /// Simulated ticks per real second.
        tick_speed: f64,
    },
}

fn team_summary(scenario: &Scenario, roster: &[UnitId], initial_hp: &HashMap<UnitId, i32>) -> TeamSummary {
    let initial_count = roster.len() as u32;
    let mut survivor_count = 0u32;
    let mut remaining_total_hp = 0i64;
    let mut damage_dealt_total = 0i64;
    let initial_total_hp: i64 = initial_hp.values().map(|&hp| i64::from(hp)).sum();

    for &id in roster {
        if let Some(unit) = scenario.engine.get(id) {
            survivor_count += 1;
            remaining_total_hp += i64::from(unit.hp);
            damage_dealt_total += i64::from(unit.damage_dealt);
        }
    }

    TeamSummary {
        initial_count,
        survivor_count,
        casualties: initial_count - survivor_count,
        initial_total_hp,
        remaining_total_hp,
        damage_dealt_total,
    }
}

/// Run a battle to completion and return its result.
///
/// `pacing` selects unlocked (no sleeps) or timed (real-time-paced) mode.
/// `pause` is consulted only in timed mode. `stop`, if set externally,
/// ends the loop at the next tick boundary regardless of pacing; the
/// returned result reflects whatever the winner computation implies about
/// the state at that point.
#[must_use]
pub fn run(mut scenario: Scenario, pacing: Pacing, pause: Option<&PauseFlag>, stop: Option<&StopFlag>) -> BattleResult {
    let span = info_span!("battle", seed = scenario.engine.seed(), units_a = scenario.team_a.len(), units_b = scenario.team_b.len());
    let _enter = span.enter();

    let initial_hp_a: HashMap<UnitId, i32> =
        scenario.team_a.iter().filter_map(|&id| scenario.engine.get(id).map(|u| (id, u.max_hp))).collect();
    let initial_hp_b: HashMap<UnitId, i32> =
        scenario.team_b.iter().filter_map(|&id| scenario.engine.get(id).map(|u| (id, u.max_hp))).collect();

    let mut order_managers: HashMap<UnitId, OrderManager> = scenario
        .team_a
        .iter()
        .chain(scenario.team_b.iter())
        .map(|&id| (id, OrderManager::new()))
        .collect();

    let seed = scenario.engine.seed();
    let mut rng_a = crate::scenario::rng_for_seed(seed);
    let mut rng_b = crate::scenario::rng_for_seed(seed.wrapping_add(1));
    scenario.general_a.begin(&scenario.engine, &mut rng_a, &mut order_managers);
    scenario.general_b.begin(&scenario.engine, &mut rng_b, &mut order_managers);

    loop {
        if scenario.engine.is_finished() {
            break;
        }
        if let Some(stop) = stop {
            if stop.is_set() {
                break;
            }
        }
        if let Pacing::Timed { .. } = pacing {
            if let Some(pause) = pause {
                while pause.is_paused() {
                    if let Some(stop) = stop {
                        if stop.is_set() {
                            break;
                        }
                    }
                    std::thread::sleep(Duration::from_millis(20));
                }
            }
        }

        scenario.general_a.create_orders(&scenario.engine, &mut order_managers);
        scenario.general_b.create_orders(&scenario.engine, &mut order_managers);

        let order_holders = scenario.engine.shuffled_live_units();
        for unit_id in order_holders {
            if scenario.engine.get(unit_id).is_none() {
                continue;
            }
            if let Some(manager) = order_managers.get_mut(&unit_id) {
                manager.advance(&mut scenario.engine);
            }
        }

        scenario.engine.finish_tick();

        if let Pacing::Timed { tick_speed } = pacing {
            if tick_speed > 0.0 {
                std::thread::sleep(Duration::from_secs_f64(1.0 / tick_speed));
            }
        }
    }

    let winner: BattleWinner = scenario.engine.winner().into();
    info!(ticks = scenario.engine.tick(), ?winner, "battle finished");

    BattleResult {
        ticks: scenario.engine.tick(),
        winner,
        team_a: team_summary(&scenario, &scenario.team_a, &initial_hp_a),
        team_b: team_summary(&scenario, &scenario.team_b, &initial_hp_b),
    }
}

/// Which team a [`crate::general::General`]'s `create_orders` flags belong
/// to, used by the tournament driver when reporting a match's generals.
#[must_use]
pub fn team_label(team: Team) -> &'static str {
    match team {
        Team::A => "A",
        Team::B => "B",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{build_lanchester};
    use crate::strategy::StrategyName;
    use crate::unit::UnitType;

    #[test]
    fn lanchester_melee_n5_team_b_wins() {
        let mut rng = crate::scenario::rng_for_seed(0);
        let profile_a = StrategyName::Daft.build(&mut rng);
        let profile_b = StrategyName::Daft.build(&mut rng);
        let scenario = build_lanchester(UnitType::Knight, 5, profile_a, profile_b, 0).unwrap();
        let result = run(scenario, Pacing::Unlocked, None, None);
        assert_eq!(result.winner, BattleWinner::B);
        assert_eq!(result.team_a.survivor_count, 0);
        assert!(result.team_b.survivor_count >= 3);
    }

    #[test]
    fn lanchester_ranged_n10_team_b_wins_with_heavy_survivors() {
        let mut rng = crate::scenario::rng_for_seed(0);
        let profile_a = StrategyName::Daft.build(&mut rng);
        let profile_b = StrategyName::Daft.build(&mut rng);
        let scenario = build_lanchester(UnitType::Crossbowman, 10, profile_a, profile_b, 0).unwrap();
        let result = run(scenario, Pacing::Unlocked, None, None);
        assert_eq!(result.winner, BattleWinner::B);
        assert!(result.team_b.survivor_count >= 10);
    }

    #[test]
    fn determinism_same_seed_yields_identical_result() {
        let mut rng = crate::scenario::rng_for_seed(0);
        let profile_a1 = StrategyName::Daft.build(&mut rng);
        let profile_b1 = StrategyName::Daft.build(&mut rng);
        let scenario1 = build_lanchester(UnitType::Knight, 5, profile_a1, profile_b1, 42).unwrap();
        let result1 = run(scenario1, Pacing::Unlocked, None, None);

        let mut rng2 = crate::scenario::rng_for_seed(0);
        let profile_a2 = StrategyName::Daft.build(&mut rng2);
        let profile_b2 = StrategyName::Daft.build(&mut rng2);
        let scenario2 = build_lanchester(UnitType::Knight, 5, profile_a2, profile_b2, 42).unwrap();
        let result2 = run(scenario2, Pacing::Unlocked, None, None);

        assert_eq!(result1.ticks, result2.ticks);
        assert_eq!(result1.winner, result2.winner);
        assert_eq!(result1.team_a.survivor_count, result2.team_a.survivor_count);
        assert_eq!(result1.team_b.survivor_count, result2.team_b.survivor_count);
    }

    #[test]
    fn stop_flag_ends_loop_early() {
        let mut rng = crate::scenario::rng_for_seed(0);
        let profile_a = StrategyName::Daft.build(&mut rng);
        let profile_b = StrategyName::Daft.build(&mut rng);
        let scenario = build_lanchester(UnitType::Knight, 5, profile_a, profile_b, 0).unwrap();
        let stop = StopFlag::new();
        stop.stop();
        let result = run(scenario, Pacing::Unlocked, None, Some(&stop));
        assert_eq!(result.ticks, 0);
    }

    #[test]
    fn walls_out_of_sight_run_out_the_clock_to_a_draw() {
        use crate::engine::Engine;
        use crate::general::General;
        use crate::math::Vec2;
        use crate::unit::Unit;

        fn spawn_pikeman(engine: &mut Engine, team: Team, position: Vec2) -> UnitId {
            let stats = crate::stats::base_stats(UnitType::Pikeman);
            engine.spawn(Unit {
                id: UnitId { index: 0, generation: 0 },
                team,
                unit_type: UnitType::Pikeman,
                position,
                max_hp: stats.max_hp,
                hp: stats.max_hp,
                armor: stats.armor,
                attack: stats.attack,
                range: stats.range,
                sight: stats.sight,
                size: stats.size,
                speed: stats.speed,
                accuracy: stats.accuracy,
                reload_time: stats.reload_time,
                reload_remaining: 0.0,
                squad_id: None,
                damage_dealt: 0,
            })
        }

        let mut engine = Engine::new(300.0, 50.0, 0);
        let team_a: Vec<UnitId> = (0..5).map(|i| spawn_pikeman(&mut engine, Team::A, Vec2::new(50.0, 5.0 * i as f64))).collect();
        let team_b: Vec<UnitId> = (0..5).map(|i| spawn_pikeman(&mut engine, Team::B, Vec2::new(150.0, 5.0 * i as f64))).collect();

        let mut rng = crate::scenario::rng_for_seed(0);
        let profile_a = StrategyName::Braindead.build(&mut rng);
        let profile_b = StrategyName::Braindead.build(&mut rng);
        let general_a = General::new(Team::A, profile_a, team_a.clone(), team_b.clone(), &engine);
        let general_b = General::new(Team::B, profile_b, team_b.clone(), team_a.clone(), &engine);
        let scenario = Scenario { engine, team_a, team_b, general_a, general_b };

        let result = run(scenario, Pacing::Unlocked, None, None);

        assert_eq!(result.winner, BattleWinner::Draw);
        assert_eq!(result.ticks, crate::engine::DEFAULT_TICK_CAP);
        assert_eq!(result.team_a.survivor_count, 5);
        assert_eq!(result.team_b.survivor_count, 5);
    }
}
