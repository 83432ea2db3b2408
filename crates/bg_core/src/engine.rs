//! The battle engine: authoritative world state plus the query and mutation
//! primitives that orders invoke each tick.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::math::{distance, Vec2};
use crate::unit::{Team, Unit, UnitId, UnitType};

/// Reload bookkeeping advances in units of `1 / DEFAULT_TICKS_PER_SECOND`
/// regardless of the runner's real-time pacing (`tick-speed`); see
/// `Engine::tick`.
pub const DEFAULT_TICKS_PER_SECOND: f64 = 5.0;

/// Recommended fixed tick cap for unlocked (headless/batch) runs.
pub const DEFAULT_TICK_CAP: u64 = 1200;

/// The minimum enforced battlefield dimension on either axis.
pub const MIN_MAP_DIMENSION: f64 = 120.0;

struct Slot {
    unit: Option<Unit>,
    generation: u32,
}

/// Winner of a battle, or a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// Team A won outright.
    A,
    /// Team B won outright.
    B,
    /// Neither side was wiped out before the tick cap, or both died together.
    Draw,
}

/// Owns all unit state for one battle and exposes the primitives orders use.
///
/// Single-threaded within one battle: there is no shared mutable state
/// between units, and all randomness (shuffle order, collision tie-break)
/// comes from this battle's own seeded RNG, never a process-global one.
pub struct Engine {
    size_x: f64,
    size_y: f64,
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    tick: u64,
    tick_cap: u64,
    seed: u64,
    rng: ChaCha8Rng,
}

impl Engine {
    /// Construct an empty engine for a battlefield of the given size.
    ///
    /// `size_x`/`size_y` are clamped up to [`MIN_MAP_DIMENSION`]; the spec
    /// treats a too-small map as a configuration error the scenario builder
    /// should reject before constructing the engine, but the engine itself
    /// never panics on it.
    #[must_use]
    pub fn new(size_x: f64, size_y: f64, seed: u64) -> Self {
        Self {
            size_x: size_x.max(MIN_MAP_DIMENSION),
            size_y: size_y.max(MIN_MAP_DIMENSION),
            slots: Vec::new(),
            free_list: Vec::new(),
            tick: 0,
            tick_cap: DEFAULT_TICK_CAP,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed this engine was constructed with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Override the tick cap (defaults to [`DEFAULT_TICK_CAP`]).
    pub fn set_tick_cap(&mut self, cap: u64) {
        self.tick_cap = cap;
    }

    /// Battlefield width.
    #[must_use]
    pub fn size_x(&self) -> f64 {
        self.size_x
    }

    /// Battlefield height.
    #[must_use]
    pub fn size_y(&self) -> f64 {
        self.size_y
    }

    /// Current tick counter.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Place a fully-formed unit on the battlefield and return its id.
    ///
    /// The `id` field of `unit` is overwritten with the id actually assigned.
    pub fn spawn(&mut self, mut unit: Unit) -> UnitId {
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation += 1;
            let id = UnitId { index, generation: slot.generation };
            unit.id = id;
            slot.unit = Some(unit);
            id
        } else {
            let index = self.slots.len() as u32;
            let id = UnitId { index, generation: 0 };
            unit.id = id;
            self.slots.push(Slot { unit: Some(unit), generation: 0 });
            id
        }
    }

    /// Resolve a unit id to a live unit, if it still resolves.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.unit.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.unit.as_mut()
    }

    /// Remove a unit from the live rosters immediately (used on lethal hits).
    pub(crate) fn despawn(&mut self, id: UnitId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation {
                slot.unit = None;
                self.free_list.push(id.index);
            }
        }
    }

    /// All live units on `team`, in arena order (not iteration order of any tick).
    #[must_use]
    pub fn live_units(&self, team: Team) -> Vec<UnitId> {
        self.slots
            .iter()
            .filter_map(|slot| slot.unit.as_ref())
            .filter(|u| u.team == team)
            .map(|u| u.id)
            .collect()
    }

    /// All live units, across both teams.
    #[must_use]
    pub fn all_live_units(&self) -> Vec<UnitId> {
        self.slots.iter().filter_map(|slot| slot.unit.as_ref()).map(|u| u.id).collect()
    }

    /// Whether `team` has no live units remaining.
    #[must_use]
    pub fn team_is_empty(&self, team: Team) -> bool {
        !self.slots.iter().filter_map(|slot| slot.unit.as_ref()).any(|u| u.team == team)
    }

    // --- queries ---

    /// `true` iff `u`'s position is within `u.speed / 2` of `(x, y)` on both axes.
    #[must_use]
    pub fn position_matches(&self, u: UnitId, target: Vec2) -> bool {
        let Some(unit) = self.get(u) else { return false };
        let tolerance = unit.speed / 2.0;
        (unit.position.x - target.x).abs() <= tolerance && (unit.position.y - target.y).abs() <= tolerance
    }

    /// `distance(a.pos, b.pos) - a.size - b.size <= a.sight`.
    #[must_use]
    pub fn in_sight(&self, a: UnitId, b: UnitId) -> bool {
        let (Some(a), Some(b)) = (self.get(a), self.get(b)) else { return false };
        distance(a.position, b.position) - a.size - b.size <= a.sight
    }

    /// `distance(a.pos, b.pos) - a.size - b.size <= a.range`.
    #[must_use]
    pub fn in_reach(&self, a: UnitId, b: UnitId) -> bool {
        let (Some(a), Some(b)) = (self.get(a), self.get(b)) else { return false };
        distance(a.position, b.position) - a.size - b.size <= a.range
    }

    fn nearest_matching<'a>(&'a self, from: Vec2, candidates: impl Iterator<Item = &'a Unit>) -> Option<UnitId> {
        candidates
            .map(|u| (u.id, distance(from, u.position)))
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(id, _)| id)
    }

    /// Nearest opposing-team unit matching `selector`, ignoring sight and reach.
    #[must_use]
    pub fn nearest_enemy(&self, u: UnitId, selector: UnitType) -> Option<UnitId> {
        let unit = self.get(u)?;
        let enemy_team = unit.team.opponent();
        let from = unit.position;
        self.nearest_matching(
            from,
            self.slots
                .iter()
                .filter_map(|s| s.unit.as_ref())
                .filter(move |c| c.team == enemy_team && selector.matches(c.unit_type)),
        )
    }

    /// As [`Engine::nearest_enemy`], filtered by [`Engine::in_sight`].
    #[must_use]
    pub fn nearest_enemy_in_sight(&self, u: UnitId, selector: UnitType) -> Option<UnitId> {
        let unit = self.get(u)?;
        let enemy_team = unit.team.opponent();
        let from = unit.position;
        let size = unit.size;
        let sight = unit.sight;
        self.nearest_matching(
            from,
            self.slots.iter().filter_map(|s| s.unit.as_ref()).filter(move |c| {
                c.team == enemy_team && selector.matches(c.unit_type) && distance(from, c.position) - size - c.size <= sight
            }),
        )
    }

    /// As [`Engine::nearest_enemy`], filtered by [`Engine::in_reach`].
    #[must_use]
    pub fn nearest_enemy_in_reach(&self, u: UnitId, selector: UnitType) -> Option<UnitId> {
        let unit = self.get(u)?;
        let enemy_team = unit.team.opponent();
        let from = unit.position;
        let size = unit.size;
        let range = unit.range;
        self.nearest_matching(
            from,
            self.slots.iter().filter_map(|s| s.unit.as_ref()).filter(move |c| {
                c.team == enemy_team && selector.matches(c.unit_type) && distance(from, c.position) - size - c.size <= range
            }),
        )
    }

    /// Nearest same-team unit matching `selector`, filtered by [`Engine::in_sight`].
    #[must_use]
    pub fn nearest_friendly_in_sight(&self, u: UnitId, selector: UnitType) -> Option<UnitId> {
        let unit = self.get(u)?;
        let team = unit.team;
        let from = unit.position;
        let size = unit.size;
        let sight = unit.sight;
        self.nearest_matching(
            from,
            self.slots.iter().filter_map(|s| s.unit.as_ref()).filter(move |c| {
                c.id != u
                    && c.team == team
                    && selector.matches(c.unit_type)
                    && distance(from, c.position) - size - c.size <= sight
            }),
        )
    }

    /// Nearest same-team unit matching `selector`, ignoring sight.
    ///
    /// Used by `StayInFriendlySpace` once it has already established no
    /// matching friendly is in sight: the regroup target is the nearest one
    /// anywhere on the field, not a second sight-filtered query.
    #[must_use]
    pub fn nearest_friendly_any(&self, u: UnitId, selector: UnitType) -> Option<UnitId> {
        let unit = self.get(u)?;
        let team = unit.team;
        let from = unit.position;
        self.nearest_matching(
            from,
            self.slots
                .iter()
                .filter_map(|s| s.unit.as_ref())
                .filter(move |c| c.id != u && c.team == team && selector.matches(c.unit_type)),
        )
    }

    // --- mutations ---

    /// Advance `u` at most `u.speed` toward `target`, resolving collisions by
    /// tangent placement and clamping to the battlefield bounds.
    ///
    /// Returns `false` always; the original source used the return value to
    /// mean "still moving" and no caller in this crate inspects it (see
    /// `DESIGN.md`/`SPEC_FULL.md` §4.1).
    pub fn move_toward(&mut self, u: UnitId, target: Vec2) -> bool {
        let Some(unit) = self.get(u) else { return false };
        let speed = unit.speed;
        let size = unit.size;
        let from = unit.position;

        let to_target = target - from;
        let dist = (to_target.x * to_target.x + to_target.y * to_target.y).sqrt();
        let mut desired = if dist <= speed {
            target
        } else {
            let step = Vec2::new(to_target.x / dist, to_target.y / dist) * speed;
            from + step
        };

        for other_id in self.all_live_units() {
            if other_id == u {
                continue;
            }
            let Some(other) = self.get(other_id) else { continue };
            let radii_sum = size + other.size;
            let d = distance(desired, other.position);
            if d < radii_sum {
                if d < f64::EPSILON {
                    let bearing = self.rng.gen_range(0.0..360.0);
                    desired = other.position + Vec2::from_bearing(bearing) * radii_sum;
                } else {
                    let unit_vec = Vec2::new((desired.x - other.position.x) / d, (desired.y - other.position.y) / d);
                    desired = other.position + unit_vec * radii_sum;
                }
            }
        }

        let clamped = desired.clamp_bounds(self.size_x, self.size_y);
        if let Some(unit) = self.get_mut(u) {
            unit.position = clamped;
        }
        false
    }

    /// Move `u` one step along the bearing from `u` to `reference`, offset by
    /// `direction_degrees`. When `reference == u`, the bearing-to-self is 0,
    /// so `direction_degrees` becomes the effective world-space bearing —
    /// the mechanism `DontMove` and `MoveByStep` rely on.
    pub fn move_one_step_angle(&mut self, u: UnitId, reference: UnitId, direction_degrees: f64) -> bool {
        let Some(unit) = self.get(u) else { return false };
        let Some(reference_unit) = self.get(reference) else { return false };
        let bearing = unit.position.bearing_to(reference_unit.position) + direction_degrees;
        let displacement = Vec2::from_bearing(bearing) * unit.speed;
        let target = unit.position + displacement;
        self.move_toward(u, target)
    }

    /// Move `u` toward `target`'s current position.
    pub fn move_toward_unit(&mut self, u: UnitId, target: UnitId) -> bool {
        let Some(target_pos) = self.get(target).map(|t| t.position) else { return false };
        self.move_toward(u, target_pos)
    }

    /// Resolve an attack from `attacker` on `target`.
    ///
    /// Precondition: attacker is reload-ready and in reach. Damage is
    /// `sum_k max(0, attack[k] - armor[k])`, scaled by the elevation
    /// modifier (currently always 1.0) and accuracy, floored at 1. Returns
    /// `true` iff the attack actually occurred.
    pub fn attack(&mut self, attacker: UnitId, target: UnitId) -> bool {
        let Some(attacker_unit) = self.get(attacker) else { return false };
        if !attacker_unit.is_reload_ready() {
            return false;
        }
        if !self.in_reach(attacker, target) {
            return false;
        }
        let Some(attacker_unit) = self.get(attacker) else { return false };
        let Some(target_unit) = self.get(target) else { return false };

        const ELEVATION_MODIFIER: f64 = 1.0;
        let raw: i32 = attacker_unit
            .attack
            .iter()
            .map(|(kind, &value)| (value - target_unit.armor.get(kind).copied().unwrap_or(0)).max(0))
            .sum();
        let damage = ((raw as f64) * ELEVATION_MODIFIER * attacker_unit.accuracy).floor().max(1.0) as i32;

        let reload_time = attacker_unit.reload_time;
        if let Some(target_unit) = self.get_mut(target) {
            target_unit.hp -= damage;
        }
        let target_died = self.get(target).is_some_and(|t| !t.is_alive());

        if let Some(attacker_unit) = self.get_mut(attacker) {
            attacker_unit.reload_remaining = reload_time;
            attacker_unit.damage_dealt += damage;
        }

        trace!(?attacker, ?target, damage, "attack resolved");
        if target_died {
            debug!(?target, "unit killed");
            self.despawn(target);
        }
        true
    }

    /// Decrement reload timers on every live unit by `dt`.
    pub fn tick_reloads(&mut self, dt: f64) {
        for slot in &mut self.slots {
            if let Some(unit) = slot.unit.as_mut() {
                if unit.reload_remaining > 0.0 {
                    unit.reload_remaining = (unit.reload_remaining - dt).max(0.0);
                }
            }
        }
    }

    /// The unit's slot on a `ring_radius`-radius ring around `members`'
    /// centroid, indexed by this unit's position within `members`.
    #[must_use]
    pub fn formation_slot(&self, u: UnitId, ring_radius: f64, members: &[UnitId]) -> Option<Vec2> {
        if members.is_empty() {
            return None;
        }
        let positions: Vec<Vec2> = members.iter().filter_map(|&id| self.get(id)).map(|unit| unit.position).collect();
        if positions.is_empty() {
            return None;
        }
        let centroid = positions.iter().fold(Vec2::ZERO, |acc, &p| acc + p) * (1.0 / positions.len() as f64);
        let index = members.iter().position(|&id| id == u)?;
        let angle = 360.0 * index as f64 / members.len() as f64;
        Some(centroid + Vec2::from_bearing(angle) * ring_radius)
    }

    /// The live unit ids in this tick's randomized iteration order. The
    /// battle runner drives each unit's `OrderManager::advance` against this
    /// order, then calls [`Engine::finish_tick`].
    #[must_use]
    pub fn shuffled_live_units(&mut self) -> Vec<UnitId> {
        let mut ids = self.all_live_units();
        shuffle(&mut self.rng, &mut ids);
        ids
    }

    /// Advance reload timers and the tick counter; called once per tick,
    /// after orders for every unit have been given a chance to act.
    pub fn finish_tick(&mut self) {
        self.tick_reloads(1.0 / DEFAULT_TICKS_PER_SECOND);
        self.tick += 1;
    }

    /// Whether the battle has reached a terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.team_is_empty(Team::A) || self.team_is_empty(Team::B) || self.tick >= self.tick_cap
    }

    /// The winner, valid once [`Engine::is_finished`] is true.
    #[must_use]
    pub fn winner(&self) -> Winner {
        let a_empty = self.team_is_empty(Team::A);
        let b_empty = self.team_is_empty(Team::B);
        match (a_empty, b_empty) {
            (false, true) => Winner::A,
            (true, false) => Winner::B,
            _ => Winner::Draw,
        }
    }
}

/// Uniform in-place shuffle (Fisher-Yates), driven by the battle's own RNG.
///
/// Never the process-global RNG: see `SPEC_FULL.md` §5/§9 on why shuffle
/// order must be reproducible per `(scenario, seed)`.
fn shuffle<T>(rng: &mut impl Rng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Log a warning for an engine-internal anomaly without propagating it; the
/// battle continues (see `SPEC_FULL.md` §7).
pub fn log_anomaly(context: &str) {
    warn!(context, "engine-internal anomaly absorbed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_unit(team: Team, unit_type: UnitType, position: Vec2) -> Unit {
        let stats = crate::stats::base_stats(unit_type);
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

    #[test]
    fn spawn_assigns_increasing_generation_on_reuse() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let a = engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::ZERO));
        assert_eq!(a.generation, 0);
        engine_despawn_for_test(&mut engine, a);
        let b = engine.spawn(sample_unit(Team::A, UnitType::Pikeman, Vec2::ZERO));
        assert_eq!(b.index, a.index);
        assert_eq!(b.generation, 1);
        assert!(engine.get(a).is_none());
    }

    fn engine_despawn_for_test(engine: &mut Engine, id: UnitId) {
        engine.despawn(id);
    }

    #[test]
    fn in_sight_accounts_for_both_radii() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let a = engine.spawn(sample_unit(Team::A, UnitType::Crossbowman, Vec2::new(0.0, 0.0)));
        let b = engine.spawn(sample_unit(Team::B, UnitType::Crossbowman, Vec2::new(20.5, 0.0)));
        assert!(engine.in_sight(a, b));
        let c = engine.spawn(sample_unit(Team::B, UnitType::Crossbowman, Vec2::new(100.0, 0.0)));
        assert!(!engine.in_sight(a, c));
    }

    #[test]
    fn move_toward_reaches_position_matches_tolerance() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let a = engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::new(0.0, 0.0)));
        for _ in 0..200 {
            if engine.position_matches(a, Vec2::new(5.0, 0.0)) {
                break;
            }
            engine.move_toward(a, Vec2::new(5.0, 0.0));
        }
        assert!(engine.position_matches(a, Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn move_toward_clamps_to_bounds() {
        let mut engine = Engine::new(120.0, 120.0, 0);
        let a = engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::new(1.0, 1.0)));
        engine.move_toward(a, Vec2::new(-500.0, -500.0));
        let pos = engine.get(a).unwrap().position;
        assert!(pos.x >= 0.0 && pos.y >= 0.0);
    }

    #[test]
    fn coincident_units_separate_without_nan() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let a = engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::new(50.0, 50.0)));
        let _b = engine.spawn(sample_unit(Team::B, UnitType::Knight, Vec2::new(50.0, 50.0)));
        engine.move_toward(a, Vec2::new(50.0, 50.0));
        let pos = engine.get(a).unwrap().position;
        assert!(!pos.x.is_nan() && !pos.y.is_nan());
    }

    #[test]
    fn attack_applies_damage_floored_at_one() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let mut attacker = sample_unit(Team::A, UnitType::Knight, Vec2::new(0.0, 0.0));
        attacker.attack = HashMap::from([(crate::unit::DamageKind::Slash, 10), (crate::unit::DamageKind::Pierce, 4)]);
        attacker.accuracy = 1.0;
        attacker.range = 5.0;
        let mut target = sample_unit(Team::B, UnitType::Pikeman, Vec2::new(1.0, 0.0));
        target.armor = HashMap::from([(crate::unit::DamageKind::Slash, 3), (crate::unit::DamageKind::Pierce, 5)]);
        target.hp = 100;
        let a = engine.spawn(attacker);
        let b = engine.spawn(target);
        assert!(engine.attack(a, b));
        assert_eq!(engine.get(b).unwrap().hp, 93);
    }

    #[test]
    fn attack_respects_reload() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let mut attacker = sample_unit(Team::A, UnitType::Knight, Vec2::new(0.0, 0.0));
        attacker.range = 5.0;
        attacker.reload_remaining = 3.0;
        let target = sample_unit(Team::B, UnitType::Pikeman, Vec2::new(1.0, 0.0));
        let a = engine.spawn(attacker);
        let b = engine.spawn(target);
        assert!(!engine.attack(a, b));
    }

    #[test]
    fn lethal_attack_removes_target_immediately() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let mut attacker = sample_unit(Team::A, UnitType::Knight, Vec2::new(0.0, 0.0));
        attacker.range = 5.0;
        attacker.accuracy = 1.0;
        let mut target = sample_unit(Team::B, UnitType::Pikeman, Vec2::new(1.0, 0.0));
        target.hp = 1;
        let a = engine.spawn(attacker);
        let b = engine.spawn(target);
        engine.attack(a, b);
        assert!(engine.get(b).is_none());
        assert!(engine.nearest_enemy(a, UnitType::All).is_none());
    }

    #[test]
    fn winner_is_draw_when_both_teams_start_empty() {
        let engine = Engine::new(200.0, 200.0, 0);
        assert!(engine.is_finished());
        assert_eq!(engine.winner(), Winner::Draw);
    }

    #[test]
    fn tick_cap_forces_draw() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        engine.set_tick_cap(3);
        engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::ZERO));
        engine.spawn(sample_unit(Team::B, UnitType::Knight, Vec2::new(10.0, 0.0)));
        for _ in 0..3 {
            engine.finish_tick();
        }
        assert!(engine.is_finished());
        assert_eq!(engine.winner(), Winner::Draw);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn move_toward_never_leaves_the_battlefield(
                x in 0.0f64..200.0, y in 0.0f64..200.0,
                tx in -100.0f64..300.0, ty in -100.0f64..300.0,
            ) {
                let mut engine = Engine::new(200.0, 200.0, 0);
                let u = engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::new(x, y)));
                engine.move_toward(u, Vec2::new(tx, ty));
                let pos = engine.get(u).unwrap().position;
                prop_assert!(pos.x >= 0.0 && pos.x <= 200.0);
                prop_assert!(pos.y >= 0.0 && pos.y <= 200.0);
                prop_assert!(!pos.x.is_nan() && !pos.y.is_nan());
            }

            #[test]
            fn move_toward_never_overlaps_another_live_unit(
                ax in 0.0f64..200.0, ay in 0.0f64..200.0,
                bx in 0.0f64..200.0, by in 0.0f64..200.0,
            ) {
                let mut engine = Engine::new(200.0, 200.0, 0);
                let a = engine.spawn(sample_unit(Team::A, UnitType::Knight, Vec2::new(ax, ay)));
                let b = engine.spawn(sample_unit(Team::B, UnitType::Knight, Vec2::new(bx, by)));
                engine.move_toward(a, Vec2::new(bx, by));

                let pos_a = engine.get(a).unwrap().position;
                let unit_b = engine.get(b).unwrap();
                let d = distance(pos_a, unit_b.position);
                let radii_sum = engine.get(a).unwrap().size + unit_b.size;
                prop_assert!(d >= radii_sum - 1e-6);
            }
        }
    }
}
