//! Scenario and unit fixture builders shared across the workspace's tests.

use bg_core::prelude::*;
use bg_core::unit::{Unit, UnitId};

/// Build a single unit of `unit_type` at `position`, using that type's base
/// stats. Not yet spawned into an engine.
#[must_use]
pub fn unit_at(team: Team, unit_type: UnitType, position: Vec2) -> Unit {
    let stats = bg_core::stats::base_stats(unit_type);
    Unit {
        id: UnitId { index: 0, generation: 0 },
        team,
        unit_type,
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
    }
}

/// Spawn a fresh unit directly into `engine` and return its id.
pub fn spawn_unit(engine: &mut Engine, team: Team, unit_type: UnitType, position: Vec2) -> UnitId {
    engine.spawn(unit_at(team, unit_type, position))
}

/// A `DAFT` vs `DAFT` classic-formation scenario, seeded for reproducibility.
/// The default fixture for tests that don't care which strategy pairing runs.
///
/// # Panics
///
/// Panics if `units_per_team` is zero.
#[must_use]
pub fn classic_scenario(units_per_team: u32, seed: u64) -> Scenario {
    let mut rng = rng_for_seed(seed);
    let profile_a = StrategyName::Daft.build(&mut rng);
    let profile_b = StrategyName::Daft.build(&mut rng);
    build(FormationTag::Classic, units_per_team, profile_a, profile_b, seed)
        .expect("classic_scenario fixture always builds with a positive units_per_team")
}

/// A Lanchester N-vs-2N scenario under `DAFT`/`DAFT`, seeded for reproducibility.
///
/// # Panics
///
/// Panics if `n` is zero.
#[must_use]
pub fn lanchester_scenario(unit_type: UnitType, n: u32, seed: u64) -> Scenario {
    let mut rng = rng_for_seed(seed);
    let profile_a = StrategyName::Daft.build(&mut rng);
    let profile_b = StrategyName::Daft.build(&mut rng);
    build_lanchester(unit_type, n, profile_a, profile_b, seed)
        .expect("lanchester_scenario fixture always builds with a positive n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_scenario_has_requested_unit_count() {
        let scenario = classic_scenario(10, 0);
        assert_eq!(scenario.team_a.len(), 10);
        assert_eq!(scenario.team_b.len(), 10);
    }

    #[test]
    fn lanchester_scenario_has_n_and_two_n_units() {
        let scenario = lanchester_scenario(UnitType::Knight, 5, 0);
        assert_eq!(scenario.team_a.len(), 5);
        assert_eq!(scenario.team_b.len(), 10);
    }

    #[test]
    fn spawn_unit_places_unit_at_requested_position() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let id = spawn_unit(&mut engine, Team::A, UnitType::Pikeman, Vec2::new(10.0, 20.0));
        let unit = engine.get(id).unwrap();
        assert_eq!(unit.position, Vec2::new(10.0, 20.0));
        assert_eq!(unit.unit_type, UnitType::Pikeman);
    }
}
