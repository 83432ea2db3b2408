//! Scenario construction: formation layouts and the specialized Lanchester builder.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::engine::{Engine, MIN_MAP_DIMENSION};
use crate::error::{BattleError, Result};
use crate::general::General;
use crate::math::Vec2;
use crate::strategy::StrategyProfile;
use crate::unit::{Team, Unit, UnitId, UnitType};

/// Upper clamp on a Lanchester scenario's map dimension.
pub const MAP_MAX: f64 = 2000.0;

/// A named formation layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormationTag {
    /// Front rank pikemen, middle rank knights, rear rank crossbowmen.
    Classic,
    /// Dense pikeman ranks, knights behind, crossbowmen at the rear.
    Defensive,
    /// Knights in a V-wedge, pikemen in a column behind, crossbowmen on the flanks.
    Offensive,
    /// Pikemen centered, knights split to top/bottom flanks, crossbowmen center-rear.
    HammerAnvil,
    /// Square perimeter of pikemen around an inner core of knights and crossbowmen.
    Testudo,
    /// Four-edge pikeman perimeter, knight inner ring, crossbowmen scattered inside.
    HollowSquare,
}

impl FormationTag {
    /// Parse a formation tag from its lowercase-hyphenated name.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnknownScenario`] if `name` doesn't match a
    /// known formation.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "classic" => Ok(Self::Classic),
            "defensive" => Ok(Self::Defensive),
            "offensive" => Ok(Self::Offensive),
            "hammer-anvil" => Ok(Self::HammerAnvil),
            "testudo" => Ok(Self::Testudo),
            "hollow-square" => Ok(Self::HollowSquare),
            other => Err(BattleError::UnknownScenario(other.to_string())),
        }
    }
}

/// An immutable-after-construction battle setup: the engine with all units
/// already spawned, each team's roster, and each side's general.
///
/// Generals' rosters alias the same `UnitId`s as `team_a`/`team_b` (ids are
/// `Copy` handles into `engine`, so there is nothing to keep in sync).
pub struct Scenario {
    /// The populated engine, ready for `battle::run`.
    pub engine: Engine,
    /// Team A's roster at construction.
    pub team_a: Vec<UnitId>,
    /// Team B's roster at construction.
    pub team_b: Vec<UnitId>,
    /// Team A's general.
    pub general_a: General,
    /// Team B's general.
    pub general_b: General,
}

/// Unit-count composition of a formation, as a ratio of pike/knight/crossbow.
struct Composition {
    pikemen: u32,
    knights: u32,
    crossbowmen: u32,
}

fn classic_ratio(units_per_team: u32) -> Composition {
    let pikemen = (units_per_team * 4) / 10;
    let knights = (units_per_team * 3) / 10;
    let crossbowmen = units_per_team.saturating_sub(pikemen).saturating_sub(knights);
    Composition { pikemen, knights, crossbowmen }
}

fn spacing_for(unit_type: UnitType) -> f64 {
    crate::stats::base_stats(unit_type).size * 2.5
}

/// Offsets (relative to the team's own facing: +x away from the midline,
/// +y across the line) for one unit type, laid out in ranks of `per_rank`
/// starting `rank_start` ranks back, each rank `rank_depth` apart.
fn rank_offsets(unit_type: UnitType, count: u32, per_rank: u32, rank_start: f64, rank_depth: f64) -> Vec<Vec2> {
    let spacing = spacing_for(unit_type);
    (0..count)
        .map(|i| {
            let rank = i / per_rank.max(1);
            let slot = i % per_rank.max(1);
            let x = rank_start + rank as f64 * rank_depth;
            let y = (slot as f64 - (per_rank.max(1) as f64 - 1.0) / 2.0) * spacing;
            Vec2::new(x, y)
        })
        .collect()
}

fn build_formation(formation: FormationTag, units_per_team: u32) -> Vec<(UnitType, Vec2)> {
    let comp = classic_ratio(units_per_team);
    let per_rank = units_per_team.max(1).min(12);
    let mut out = Vec::new();

    match formation {
        FormationTag::Classic => {
            out.extend(rank_offsets(UnitType::Pikeman, comp.pikemen, per_rank, 0.0, 3.0).into_iter().map(|o| (UnitType::Pikeman, o)));
            out.extend(rank_offsets(UnitType::Knight, comp.knights, per_rank, 6.0, 3.0).into_iter().map(|o| (UnitType::Knight, o)));
            out.extend(
                rank_offsets(UnitType::Crossbowman, comp.crossbowmen, per_rank, 12.0, 3.0)
                    .into_iter()
                    .map(|o| (UnitType::Crossbowman, o)),
            );
        }
        FormationTag::Defensive => {
            out.extend(rank_offsets(UnitType::Pikeman, comp.pikemen, per_rank, 0.0, 1.5).into_iter().map(|o| (UnitType::Pikeman, o)));
            out.extend(rank_offsets(UnitType::Knight, comp.knights, per_rank, 6.0, 3.0).into_iter().map(|o| (UnitType::Knight, o)));
            out.extend(
                rank_offsets(UnitType::Crossbowman, comp.crossbowmen, per_rank, 12.0, 3.0)
                    .into_iter()
                    .map(|o| (UnitType::Crossbowman, o)),
            );
        }
        FormationTag::Offensive => {
            let spacing = spacing_for(UnitType::Knight);
            let mut remaining = comp.knights;
            let mut row = 0u32;
            let mut x = 0.0;
            while remaining > 0 {
                let row_count = (2 * row + 1).min(remaining);
                for slot in 0..row_count {
                    let y = (slot as f64 - (row_count as f64 - 1.0) / 2.0) * spacing;
                    out.push((UnitType::Knight, Vec2::new(x, y)));
                }
                remaining -= row_count;
                row += 1;
                x += spacing;
            }
            out.extend(rank_offsets(UnitType::Pikeman, comp.pikemen, 1, x + 3.0, 3.0).into_iter().map(|o| (UnitType::Pikeman, o)));
            let flank_spacing = spacing_for(UnitType::Crossbowman);
            for i in 0..comp.crossbowmen {
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                let depth = (i / 2) as f64;
                let y = side * (x / 2.0 + flank_spacing * (1.0 + depth));
                out.push((UnitType::Crossbowman, Vec2::new(x / 2.0, y)));
            }
        }
        FormationTag::HammerAnvil => {
            out.extend(rank_offsets(UnitType::Pikeman, comp.pikemen, per_rank, 3.0, 3.0).into_iter().map(|o| (UnitType::Pikeman, o)));
            let knight_spacing = spacing_for(UnitType::Knight);
            for i in 0..comp.knights {
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                let slot = (i / 2) as f64;
                let y = side * (per_rank as f64 * spacing_for(UnitType::Pikeman) / 2.0 + knight_spacing * (1.0 + slot));
                out.push((UnitType::Knight, Vec2::new(3.0, y)));
            }
            out.extend(
                rank_offsets(UnitType::Crossbowman, comp.crossbowmen, per_rank, 9.0, 3.0)
                    .into_iter()
                    .map(|o| (UnitType::Crossbowman, o)),
            );
        }
        FormationTag::Testudo => {
            let perimeter = comp.pikemen.max(4);
            let radius = perimeter as f64 * spacing_for(UnitType::Pikeman) / (2.0 * std::f64::consts::PI);
            for i in 0..comp.pikemen {
                let angle = 360.0 * i as f64 / perimeter as f64;
                out.push((UnitType::Pikeman, Vec2::from_bearing(angle) * radius));
            }
            let inner_radius = radius * 0.5;
            let inner_total = comp.knights + comp.crossbowmen;
            for i in 0..comp.knights {
                let angle = 360.0 * i as f64 / inner_total.max(1) as f64;
                out.push((UnitType::Knight, Vec2::from_bearing(angle) * inner_radius));
            }
            for i in 0..comp.crossbowmen {
                let angle = 360.0 * (comp.knights + i) as f64 / inner_total.max(1) as f64;
                out.push((UnitType::Crossbowman, Vec2::from_bearing(angle) * inner_radius));
            }
        }
        FormationTag::HollowSquare => {
            let side_count = (comp.pikemen / 4).max(1);
            let side_len = side_count as f64 * spacing_for(UnitType::Pikeman);
            let half = side_len / 2.0;
            let mut placed = 0;
            for edge in 0..4 {
                for i in 0..side_count {
                    if placed >= comp.pikemen {
                        break;
                    }
                    let t = i as f64 * spacing_for(UnitType::Pikeman) - half;
                    let pos = match edge {
                        0 => Vec2::new(-half, t),
                        1 => Vec2::new(half, t),
                        2 => Vec2::new(t, -half),
                        _ => Vec2::new(t, half),
                    };
                    out.push((UnitType::Pikeman, pos));
                    placed += 1;
                }
            }
            let ring_radius = half * 0.5;
            for i in 0..comp.knights {
                let angle = 360.0 * i as f64 / comp.knights.max(1) as f64;
                out.push((UnitType::Knight, Vec2::from_bearing(angle) * ring_radius));
            }
            let scatter_radius = ring_radius * 0.4;
            for i in 0..comp.crossbowmen {
                let angle = 137.5 * i as f64;
                let r = scatter_radius * (i as f64 + 1.0).sqrt() / (comp.crossbowmen as f64 + 1.0).sqrt();
                out.push((UnitType::Crossbowman, Vec2::from_bearing(angle) * r));
            }
        }
    }

    out
}

fn spawn_team(
    engine: &mut Engine,
    team: Team,
    offsets: &[(UnitType, Vec2)],
    anchor_x: f64,
    facing: f64,
    center_y: f64,
) -> Vec<UnitId> {
    offsets
        .iter()
        .map(|&(unit_type, offset)| {
            let stats = crate::stats::base_stats(unit_type);
            let position = Vec2::new(anchor_x + facing * offset.x, center_y + offset.y);
            engine.spawn(Unit {
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
            })
        })
        .collect()
}

/// Build a scenario: `units_per_team` units on each side laid out per
/// `formation`, mirrored across the vertical midline, with the given
/// strategy profiles and per-battle seed.
///
/// # Errors
///
/// Returns [`BattleError::InvalidParameter`] if `units_per_team` is zero.
pub fn build(
    formation: FormationTag,
    units_per_team: u32,
    profile_a: StrategyProfile,
    profile_b: StrategyProfile,
    seed: u64,
) -> Result<Scenario> {
    if units_per_team == 0 {
        return Err(BattleError::InvalidParameter {
            name: "units_per_team".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let offsets = build_formation(formation, units_per_team);
    let depth = offsets.iter().map(|(_, o)| o.x).fold(0.0_f64, f64::max).max(1.0);
    let size_x = (depth * 2.2 + 40.0).max(MIN_MAP_DIMENSION);
    let size_y = (units_per_team as f64 * 4.0).max(MIN_MAP_DIMENSION);
    let center_y = size_y / 2.0;

    let mut engine = Engine::new(size_x, size_y, seed);
    let team_a = spawn_team(&mut engine, Team::A, &offsets, size_x / 2.0, -1.0, center_y);
    let team_b = spawn_team(&mut engine, Team::B, &offsets, size_x / 2.0, 1.0, center_y);

    let general_a = General::new(Team::A, profile_a, team_a.clone(), team_b.clone(), &engine);
    let general_b = General::new(Team::B, profile_b, team_b.clone(), team_a.clone(), &engine);

    Ok(Scenario { engine, team_a, team_b, general_a, general_b })
}

/// Specialized builder: `n` homogeneous units of `unit_type` on the left,
/// `2n` on the right, close enough that the larger army is in sight of the
/// smaller from tick 0. Map size scales with `sqrt(n)`, clamped to
/// `[MIN_MAP_DIMENSION, MAP_MAX]`.
///
/// # Errors
///
/// Returns [`BattleError::InvalidParameter`] if `n` is zero.
pub fn build_lanchester(unit_type: UnitType, n: u32, profile_a: StrategyProfile, profile_b: StrategyProfile, seed: u64) -> Result<Scenario> {
    if n == 0 {
        return Err(BattleError::InvalidParameter { name: "n".to_string(), message: "must be at least 1".to_string() });
    }

    let stats = crate::stats::base_stats(unit_type);
    let spacing = stats.size * 2.5;
    let size_x = ((n as f64).sqrt() * 20.0).clamp(MIN_MAP_DIMENSION, MAP_MAX);
    let size_y = ((2 * n) as f64 * spacing).clamp(MIN_MAP_DIMENSION, MAP_MAX);
    let mut engine = Engine::new(size_x, size_y, seed);

    let gap = stats.sight * 0.6;
    let left_x = size_x / 2.0 - gap / 2.0;
    let right_x = size_x / 2.0 + gap / 2.0;
    let center_y = size_y / 2.0;

    let mut team_a = Vec::with_capacity(n as usize);
    for i in 0..n {
        let y = center_y + (i as f64 - (n as f64 - 1.0) / 2.0) * spacing;
        team_a.push(spawn_team(&mut engine, Team::A, &[(unit_type, Vec2::ZERO)], left_x, 0.0, y)[0]);
    }
    let mut team_b = Vec::with_capacity((2 * n) as usize);
    for i in 0..2 * n {
        let y = center_y + (i as f64 - (2 * n) as f64 / 2.0) * spacing;
        team_b.push(spawn_team(&mut engine, Team::B, &[(unit_type, Vec2::ZERO)], right_x, 0.0, y)[0]);
    }

    let general_a = General::new(Team::A, profile_a, team_a.clone(), team_b.clone(), &engine);
    let general_b = General::new(Team::B, profile_b, team_b.clone(), team_a.clone(), &engine);

    Ok(Scenario { engine, team_a, team_b, general_a, general_b })
}

/// Seed an RNG the same way the runner does, so ad-hoc callers (tests,
/// strategy previews) get the same shuffle/tie-break sequence a real battle would.
#[must_use]
pub fn rng_for_seed(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
