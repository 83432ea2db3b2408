//! RON-based scenario persistence.
//!
//! Scenario/strategy files are meant to be hand-edited, so this crate uses
//! RON rather than a binary format; result tables, which are consumed by
//! external plotting tools rather than edited by hand, persist as JSON
//! instead (see `bg_runner`).

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::{BattleError, Result};
use crate::general::General;
use crate::math::Vec2;
use crate::scenario::Scenario;
use crate::strategy::StrategyName;
use crate::unit::{Team, Unit, UnitId, UnitType};

/// One unit's persisted fields: team, type, position, and current HP.
///
/// Deliberately narrow (see `SPEC_FULL.md` §6 "Persisted state"): reload
/// timers and cumulative damage are mid-battle bookkeeping, not part of a
/// scenario's durable identity, and reset to their initial values on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Which side this unit fights for.
    pub team: Team,
    /// Concrete unit type.
    pub unit_type: UnitType,
    /// Position at the time of serialization.
    pub position: Vec2,
    /// Hit points at the time of serialization.
    pub hp: i32,
}

/// The full serializable snapshot of a [`Scenario`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioData {
    /// Battlefield width.
    pub size_x: f64,
    /// Battlefield height.
    pub size_y: f64,
    /// The seed this scenario's engine was constructed with.
    pub seed: u64,
    /// Every unit on the battlefield, team A and team B alike.
    pub units: Vec<UnitRecord>,
    /// Team A's named strategy.
    pub general_a_strategy: StrategyName,
    /// Team B's named strategy.
    pub general_b_strategy: StrategyName,
}

/// Snapshot a live [`Scenario`] into its serializable form.
#[must_use]
pub fn to_data(scenario: &Scenario, general_a_strategy: StrategyName, general_b_strategy: StrategyName) -> ScenarioData {
    let units = scenario
        .team_a
        .iter()
        .chain(scenario.team_b.iter())
        .filter_map(|&id| scenario.engine.get(id))
        .map(|u| UnitRecord { team: u.team, unit_type: u.unit_type, position: u.position, hp: u.hp })
        .collect();

    ScenarioData {
        size_x: scenario.engine.size_x(),
        size_y: scenario.engine.size_y(),
        seed: scenario.engine.seed(),
        units,
        general_a_strategy,
        general_b_strategy,
    }
}

/// Reconstruct a live [`Scenario`] from a snapshot.
///
/// Reload timers and cumulative damage start fresh, matching a unit's state
/// right after spawn with the persisted HP substituted in.
///
/// # Errors
///
/// Returns [`BattleError::InvalidParameter`] if `data.units` references `All`/`None`.
pub fn from_data(data: &ScenarioData) -> Result<Scenario> {
    let mut engine = Engine::new(data.size_x, data.size_y, data.seed);
    let mut team_a = Vec::new();
    let mut team_b = Vec::new();

    for record in &data.units {
        if matches!(record.unit_type, UnitType::All | UnitType::None) {
            return Err(BattleError::InvalidParameter {
                name: "units[].unit_type".to_string(),
                message: "must be a concrete unit type".to_string(),
            });
        }
        let stats = crate::stats::base_stats(record.unit_type);
        let id = engine.spawn(Unit {
            id: UnitId { index: 0, generation: 0 },
            team: record.team,
            unit_type: record.unit_type,
            position: record.position,
            max_hp: stats.max_hp,
            hp: record.hp,
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
        });
        match record.team {
            Team::A => team_a.push(id),
            Team::B => team_b.push(id),
        }
    }

    let mut rng_a = crate::scenario::rng_for_seed(data.seed);
    let mut rng_b = crate::scenario::rng_for_seed(data.seed.wrapping_add(1));
    let profile_a = data.general_a_strategy.build(&mut rng_a);
    let profile_b = data.general_b_strategy.build(&mut rng_b);

    let general_a = General::new(Team::A, profile_a, team_a.clone(), team_b.clone(), &engine);
    let general_b = General::new(Team::B, profile_b, team_b.clone(), team_a.clone(), &engine);

    Ok(Scenario { engine, team_a, team_b, general_a, general_b })
}

/// Serialize a snapshot to a RON string.
///
/// # Errors
///
/// Returns [`BattleError::DataParseError`] if RON encoding fails (practically
/// unreachable for this data shape, but the fallible path is surfaced rather
/// than unwrapped).
pub fn to_ron(data: &ScenarioData) -> Result<String> {
    ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())
        .map_err(|e| BattleError::DataParseError { path: "<in-memory>".to_string(), message: e.to_string() })
}

/// Parse a snapshot from a RON string read from `path` (used only for the error message).
///
/// # Errors
///
/// Returns [`BattleError::DataParseError`] if `text` is not valid RON for [`ScenarioData`].
pub fn from_ron(path: &str, text: &str) -> Result<ScenarioData> {
    ron::de::from_str(text).map_err(|e| BattleError::DataParseError { path: path.to_string(), message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{build_lanchester, rng_for_seed};

    #[test]
    fn round_trip_preserves_unit_count_and_positions() {
        let mut rng = rng_for_seed(0);
        let profile_a = StrategyName::Daft.build(&mut rng);
        let profile_b = StrategyName::Daft.build(&mut rng);
        let scenario = build_lanchester(UnitType::Knight, 5, profile_a, profile_b, 7).unwrap();
        let data = to_data(&scenario, StrategyName::Daft, StrategyName::Daft);

        let text = to_ron(&data).unwrap();
        let parsed = from_ron("scenario.ron", &text).unwrap();
        let restored = from_data(&parsed).unwrap();

        assert_eq!(restored.team_a.len(), scenario.team_a.len());
        assert_eq!(restored.team_b.len(), scenario.team_b.len());
        assert_eq!(restored.engine.size_x(), scenario.engine.size_x());
        assert_eq!(restored.engine.seed(), scenario.engine.seed());

        let original_pos = scenario.engine.get(scenario.team_a[0]).unwrap().position;
        let restored_pos = restored.engine.get(restored.team_a[0]).unwrap().position;
        assert_eq!(original_pos, restored_pos);
    }

    #[test]
    fn round_trip_under_same_seed_yields_identical_battle_result() {
        let mut rng = rng_for_seed(0);
        let profile_a = StrategyName::Daft.build(&mut rng);
        let profile_b = StrategyName::Daft.build(&mut rng);
        let scenario = build_lanchester(UnitType::Knight, 5, profile_a, profile_b, 7).unwrap();
        let data = to_data(&scenario, StrategyName::Daft, StrategyName::Daft);
        let restored = from_data(&data).unwrap();

        let result1 = crate::battle::run(scenario, crate::battle::Pacing::Unlocked, None, None);
        let result2 = crate::battle::run(restored, crate::battle::Pacing::Unlocked, None, None);

        assert_eq!(result1.winner, result2.winner);
        assert_eq!(result1.ticks, result2.ticks);
        assert_eq!(result1.team_a.survivor_count, result2.team_a.survivor_count);
    }

    #[test]
    fn from_ron_rejects_garbage() {
        let result = from_ron("bad.ron", "not valid ron {{{");
        assert!(result.is_err());
    }
}
