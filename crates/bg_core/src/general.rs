//! The general: owns a side's order-issuing policy and its view of both rosters.

use rand::Rng;
use std::collections::HashMap;

use crate::engine::Engine;
use crate::order::OrderManager;
use crate::strategy::StrategyProfile;
use crate::unit::{Team, UnitId, UnitType};

/// One side's strategic controller.
///
/// Owns the rosters it reasons about (`my_units`/`enemy_units`), its
/// strategy profile, and the three `has_X_left` flags that gate depletion
/// handlers. Never mutates engine state directly; only ever adds to an
/// `OrderManager` (see `strategy::TroopStrategy::apply`).
pub struct General {
    team: Team,
    profile: StrategyProfile,
    my_units: Vec<UnitId>,
    enemy_units: Vec<UnitId>,
    has_knights_left: bool,
    has_pikemen_left: bool,
    has_crossbowmen_left: bool,
    begun: bool,
}

impl General {
    /// Construct a general for `team`, given the full initial rosters (this
    /// side's and the opponent's) and the engine they were spawned into.
    ///
    /// Each `has_X_left` flag is seeded from whether `my_units` actually
    /// contains a live unit of that type at construction time — a type
    /// absent from the roster from the start never fires its depletion
    /// handler (depletion is a count-hits-zero transition, not "started at
    /// zero").
    #[must_use]
    pub fn new(team: Team, profile: StrategyProfile, my_units: Vec<UnitId>, enemy_units: Vec<UnitId>, engine: &Engine) -> Self {
        let has_knights_left = Self::any_live_of_type_in(engine, &my_units, UnitType::Knight);
        let has_pikemen_left = Self::any_live_of_type_in(engine, &my_units, UnitType::Pikeman);
        let has_crossbowmen_left = Self::any_live_of_type_in(engine, &my_units, UnitType::Crossbowman);
        Self { team, profile, my_units, enemy_units, has_knights_left, has_pikemen_left, has_crossbowmen_left, begun: false }
    }

    /// This general's team.
    #[must_use]
    pub fn team(&self) -> Team {
        self.team
    }

    fn any_live_of_type(&self, engine: &Engine, unit_type: UnitType) -> bool {
        Self::any_live_of_type_in(engine, &self.my_units, unit_type)
    }

    fn any_live_of_type_in(engine: &Engine, units: &[UnitId], unit_type: UnitType) -> bool {
        units.iter().any(|&id| engine.get(id).is_some_and(|u| u.is_alive() && u.unit_type == unit_type))
    }

    /// One-time battle-start installation: runs the start strategy (if any),
    /// then installs this side's troop strategy on every currently-live unit.
    ///
    /// Idempotent after the first call — a second call is a no-op.
    pub fn begin(&mut self, engine: &Engine, rng: &mut impl Rng, order_managers: &mut HashMap<UnitId, OrderManager>) {
        if self.begun {
            return;
        }
        self.begun = true;

        if let Some(start) = self.profile.start.clone() {
            let candidates: Vec<UnitId> =
                self.my_units.iter().copied().filter(|&id| engine.get(id).is_some()).collect();
            start.apply(rng, &candidates, |unit, order, priority| {
                if let Some(manager) = order_managers.get_mut(&unit) {
                    if manager.add(order, priority).is_err() {
                        crate::engine::log_anomaly("start strategy: priority slot already occupied");
                    }
                }
            });
        }

        for &unit_id in &self.my_units {
            let Some(unit) = engine.get(unit_id) else { continue };
            let strategy = self.profile.for_type(unit.unit_type);
            if let Some(manager) = order_managers.get_mut(&unit_id) {
                strategy.apply(rng, manager, unit_id);
            }
        }
    }

    /// Per-tick hook: fire any depletion handler for a type that just hit
    /// zero live units on this side, exactly once per type per battle.
    pub fn create_orders(&mut self, engine: &Engine, order_managers: &mut HashMap<UnitId, OrderManager>) {
        self.fire_depletion(engine, order_managers, UnitType::Knight);
        self.fire_depletion(engine, order_managers, UnitType::Pikeman);
        self.fire_depletion(engine, order_managers, UnitType::Crossbowman);
    }

    fn fire_depletion(&mut self, engine: &Engine, order_managers: &mut HashMap<UnitId, OrderManager>, unit_type: UnitType) {
        let flag = match unit_type {
            UnitType::Knight => &mut self.has_knights_left,
            UnitType::Pikeman => &mut self.has_pikemen_left,
            UnitType::Crossbowman => &mut self.has_crossbowmen_left,
            UnitType::All | UnitType::None => return,
        };
        if !*flag || self.any_live_of_type(engine, unit_type) {
            return;
        }
        *flag = false;

        let handler = match unit_type {
            UnitType::Knight => self.profile.on_knights_depleted.clone(),
            UnitType::Pikeman => self.profile.on_pikemen_depleted.clone(),
            UnitType::Crossbowman => self.profile.on_crossbowmen_depleted.clone(),
            UnitType::All | UnitType::None => None,
        };
        let Some(handler) = handler else { return };

        for &unit_id in &self.my_units.clone() {
            if engine.get(unit_id).is_none() {
                continue;
            }
            if let Some(manager) = order_managers.get_mut(&unit_id) {
                handler.apply(manager, unit_id);
            }
        }
    }

    /// This side's roster as given at construction (not filtered for liveness).
    #[must_use]
    pub fn my_units(&self) -> &[UnitId] {
        &self.my_units
    }

    /// The opposing side's roster as observed at construction.
    #[must_use]
    pub fn enemy_units(&self) -> &[UnitId] {
        &self.enemy_units
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::strategy::StrategyName;
    use crate::unit::Unit;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn_unit(engine: &mut Engine, team: Team, unit_type: UnitType) -> UnitId {
        let stats = crate::stats::base_stats(unit_type);
        engine.spawn(Unit {
            id: UnitId { index: 0, generation: 0 },
            team,
            unit_type,
            position: Vec2::ZERO,
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

    #[test]
    fn begin_installs_orders_for_every_live_unit() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let k = spawn_unit(&mut engine, Team::A, UnitType::Knight);
        let p = spawn_unit(&mut engine, Team::A, UnitType::Pikeman);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let profile = StrategyName::Daft.build(&mut rng);
        let mut general = General::new(Team::A, profile, vec![k, p], vec![], &engine);
        let mut managers: HashMap<UnitId, OrderManager> = [(k, OrderManager::new()), (p, OrderManager::new())].into();
        general.begin(&engine, &mut rng, &mut managers);
        assert_eq!(managers[&k].len(), 1);
        assert_eq!(managers[&p].len(), 1);
    }

    #[test]
    fn begin_is_idempotent() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let k = spawn_unit(&mut engine, Team::A, UnitType::Knight);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let profile = StrategyName::Daft.build(&mut rng);
        let mut general = General::new(Team::A, profile, vec![k], vec![], &engine);
        let mut managers: HashMap<UnitId, OrderManager> = [(k, OrderManager::new())].into();
        general.begin(&engine, &mut rng, &mut managers);
        general.begin(&engine, &mut rng, &mut managers);
        assert_eq!(managers[&k].len(), 1);
    }

    #[test]
    fn absent_type_never_fires_its_depletion_handler() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let c = spawn_unit(&mut engine, Team::A, UnitType::Crossbowman);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let profile = StrategyName::SomeIq.build(&mut rng);
        // No knights or pikemen on this roster at all, so their depletion
        // handlers must never fire — only a type that was present and then
        // hit zero should trigger one.
        let mut general = General::new(Team::A, profile, vec![c], vec![], &engine);
        let mut managers: HashMap<UnitId, OrderManager> = [(c, OrderManager::new())].into();
        general.begin(&engine, &mut rng, &mut managers);
        let installed_at_begin = managers[&c].len();

        general.create_orders(&engine, &mut managers);
        assert_eq!(managers[&c].len(), installed_at_begin, "crossbowman's own SOMEIQ orders must survive untouched");
    }

    #[test]
    fn depletion_handler_fires_once_when_type_hits_zero() {
        let mut engine = Engine::new(200.0, 200.0, 0);
        let k = spawn_unit(&mut engine, Team::A, UnitType::Knight);
        let c = spawn_unit(&mut engine, Team::A, UnitType::Crossbowman);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let profile = StrategyName::SomeIq.build(&mut rng);
        let mut general = General::new(Team::A, profile, vec![k, c], vec![], &engine);
        let mut managers: HashMap<UnitId, OrderManager> = [(k, OrderManager::new()), (c, OrderManager::new())].into();
        general.begin(&engine, &mut rng, &mut managers);

        // kill the knight, for real, not just flagged via hp
        engine.despawn(k);
        general.create_orders(&engine, &mut managers);
        // crossbowman's orders get flushed and replaced with one order
        assert_eq!(managers[&c].len(), 1);

        // firing again should be a no-op (flag already cleared)
        managers.get_mut(&c).unwrap().add_max_priority(crate::order::Order::new(
            c,
            crate::order::OrderKind::DontMove { remaining: 1, sign: 1.0 },
        ));
        general.create_orders(&engine, &mut managers);
        assert_eq!(managers[&c].len(), 2);
    }
}
