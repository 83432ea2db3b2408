//! The strategy system: per-type order installation, battle-start setup, and
//! depletion handlers, plus the named-strategy registry.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{BattleError, Result};
use crate::order::{Order, OrderKind};
use crate::unit::{UnitId, UnitType};

/// Maps `(general, unit)` to a side effect: installing one or more orders on
/// that unit. Strategies never touch engine state directly — only
/// `OrderManager::add`/`add_max_priority` (see `general::General::begin`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TroopStrategy {
    /// `AttackOnSight(ALL)` at priority 0.
    Braindead,
    /// `AttackNearestOmniscient(ALL)` at priority 0.
    Daft,
    /// Generic favorite/hated wiring: p0 attack favorite, p1 avoid hated, p2 attack ALL.
    ///
    /// `favorite != hated` is enforced at construction (see [`TroopStrategy::simple`]).
    Simple {
        /// Preferred target type.
        favorite: UnitType,
        /// Avoided type.
        hated: UnitType,
    },
    /// The SOMEIQ per-type wiring for Crossbowman: p0 `Avoid(Knight)`,
    /// p1 `AttackNearestOmniscient(Pikeman)`, p2 `AttackNearestOmniscient(ALL)`.
    SomeiqCrossbowman,
    /// The SOMEIQ per-type wiring for Knight: p0 `AttackNearestOmniscient(Crossbowman)`,
    /// p1 `AttackNearestOmniscient(ALL)`.
    SomeiqKnight,
    /// The SOMEIQ per-type wiring for Pikeman: p0 `AttackNearestOmniscient(Knight)`,
    /// p1 `AttackNearestOmniscient(ALL)`.
    SomeiqPikeman,
    /// RANDOMIQ's per-unit resolution: at apply time, independently roll one
    /// of BRAINDEAD/DAFT/SOMEIQ/RPC and install *that* strategy's wiring for
    /// `unit_type` on this one unit.
    RandomPerUnit {
        /// The concrete type being installed for (so the rolled strategy's
        /// per-type wiring can be looked up).
        unit_type: UnitType,
    },
}

impl TroopStrategy {
    /// Construct a `Simple` strategy, rejecting `favorite == hated`.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::FavoriteEqualsHated`] if the two types are equal.
    pub fn simple(favorite: UnitType, hated: UnitType) -> Result<Self> {
        if favorite == hated {
            return Err(BattleError::FavoriteEqualsHated(favorite));
        }
        Ok(Self::Simple { favorite, hated })
    }

    /// Install this strategy's orders on `unit` via `add_max_priority`.
    ///
    /// `rng` is only consumed by [`Self::RandomPerUnit`]; every other variant
    /// is deterministic given `self` alone.
    pub fn apply(&self, rng: &mut impl Rng, orders: &mut crate::order::OrderManager, unit: UnitId) {
        match self {
            Self::Braindead => {
                orders.add_max_priority(Order::new(unit, OrderKind::AttackOnSight { selector: UnitType::All }));
            }
            Self::Daft => {
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::All }));
            }
            Self::Simple { favorite, hated } => {
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: *favorite }));
                orders.add_max_priority(Order::new(unit, OrderKind::Avoid { selector: *hated }));
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::All }));
            }
            Self::SomeiqCrossbowman => {
                orders.add_max_priority(Order::new(unit, OrderKind::Avoid { selector: UnitType::Knight }));
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::Pikeman }));
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::All }));
            }
            Self::SomeiqKnight => {
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::Crossbowman }));
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::All }));
            }
            Self::SomeiqPikeman => {
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::Knight }));
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::All }));
            }
            Self::RandomPerUnit { unit_type } => {
                const CHOICES: [StrategyName; 4] = [StrategyName::Braindead, StrategyName::Daft, StrategyName::SomeIq, StrategyName::Rpc];
                let rolled = CHOICES[rng.gen_range(0..CHOICES.len())];
                let profile = rolled.build(rng);
                profile.for_type(*unit_type).apply(rng, orders, unit);
            }
        }
    }
}

/// One-time order installation at battle start, invoked before any
/// troop-strategy installation (see `General::begin`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StartStrategy {
    /// Place a `Sacrifice` order at the enforce slot on one randomly chosen
    /// live unit from `candidates`.
    SacrificeHandler {
        /// Designated edge the sacrificed unit marches toward.
        edge: crate::math::Vec2,
    },
}

impl StartStrategy {
    /// Invoke this start strategy, choosing among `candidates` with `rng`
    /// where randomness is needed.
    pub fn apply(
        &self,
        rng: &mut impl Rng,
        candidates: &[UnitId],
        mut install: impl FnMut(UnitId, Order, i64),
    ) {
        match self {
            Self::SacrificeHandler { edge } => {
                if candidates.is_empty() {
                    return;
                }
                let index = rng.gen_range(0..candidates.len());
                let chosen = candidates[index];
                install(chosen, Order::new(chosen, OrderKind::Sacrifice { edge: *edge }), crate::order::ENFORCE_PRIORITY);
            }
        }
    }
}

/// Invoked when a concrete type's live count on one side drops to zero;
/// rewrites the remaining units' orders for that side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DepletionHandler {
    /// Flush `unit`'s orders and re-install `AttackNearestOmniscient(ALL)`.
    SwitchToOmniscientAll,
}

impl DepletionHandler {
    /// Apply this handler to a single still-living unit of a surviving type.
    pub fn apply(&self, orders: &mut crate::order::OrderManager, unit: UnitId) {
        match self {
            Self::SwitchToOmniscientAll => {
                orders.flush();
                orders.add_max_priority(Order::new(unit, OrderKind::AttackNearestOmniscient { selector: UnitType::All }));
            }
        }
    }
}

/// A fully-specified general configuration: one `TroopStrategy` per concrete
/// type, an optional start strategy, and optional per-type depletion
/// handlers. This is what the named-strategy registry produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyProfile {
    /// Troop strategy for Knights.
    pub knight: TroopStrategy,
    /// Troop strategy for Pikemen.
    pub pikeman: TroopStrategy,
    /// Troop strategy for Crossbowmen.
    pub crossbowman: TroopStrategy,
    /// One-time battle-start installation, if any.
    pub start: Option<StartStrategy>,
    /// Depletion handler fired when this side's Knight count hits zero.
    pub on_knights_depleted: Option<DepletionHandler>,
    /// Depletion handler fired when this side's Pikeman count hits zero.
    pub on_pikemen_depleted: Option<DepletionHandler>,
    /// Depletion handler fired when this side's Crossbowman count hits zero.
    pub on_crossbowmen_depleted: Option<DepletionHandler>,
}

impl StrategyProfile {
    /// The troop strategy for `unit_type`.
    ///
    /// # Panics
    ///
    /// Panics if `unit_type` is `All` or `None` (query-only selectors, never
    /// the type of an actual unit).
    #[must_use]
    pub fn for_type(&self, unit_type: UnitType) -> &TroopStrategy {
        match unit_type {
            UnitType::Knight => &self.knight,
            UnitType::Pikeman => &self.pikeman,
            UnitType::Crossbowman => &self.crossbowman,
            UnitType::All | UnitType::None => panic!("strategy profile has no entry for selector {unit_type:?}"),
        }
    }
}

/// Name of a built-in strategy, as referenced by the CLI, the tournament
/// driver, and the parameter-sweep driver — the one source of truth
/// mentioned in `SPEC_FULL.md` §4.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyName {
    /// `AttackOnSight(ALL)` for every unit.
    Braindead,
    /// `AttackNearestOmniscient(ALL)` for every unit.
    Daft,
    /// Type-specialized rock-paper-scissors-like wiring with an optional sacrifice opener.
    SomeIq,
    /// Rock-paper-counter: Knight->Crossbow->Pike->Knight preference cycle.
    Rpc,
    /// Per-unit random choice among the other named strategies at battle start.
    RandomIq,
}

impl StrategyName {
    /// Parse a strategy name from its registry key (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::UnknownStrategy`] if `name` doesn't match any
    /// built-in.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_ascii_uppercase().as_str() {
            "BRAINDEAD" => Ok(Self::Braindead),
            "DAFT" => Ok(Self::Daft),
            "SOMEIQ" => Ok(Self::SomeIq),
            "RPC" => Ok(Self::Rpc),
            "RANDOMIQ" => Ok(Self::RandomIq),
            other => Err(BattleError::UnknownStrategy(other.to_string())),
        }
    }

    /// Build the concrete `StrategyProfile` for this name.
    ///
    /// Every name produces a fixed, deterministic profile — including
    /// `RandomIq`, whose profile wires `TroopStrategy::RandomPerUnit` into
    /// every slot; the actual random choice happens later, independently per
    /// unit, inside [`TroopStrategy::apply`] at battle start.
    #[must_use]
    pub fn build(self, _rng: &mut impl Rng) -> StrategyProfile {
        match self {
            Self::Braindead => StrategyProfile {
                knight: TroopStrategy::Braindead,
                pikeman: TroopStrategy::Braindead,
                crossbowman: TroopStrategy::Braindead,
                start: None,
                on_knights_depleted: None,
                on_pikemen_depleted: None,
                on_crossbowmen_depleted: None,
            },
            Self::Daft => StrategyProfile {
                knight: TroopStrategy::Daft,
                pikeman: TroopStrategy::Daft,
                crossbowman: TroopStrategy::Daft,
                start: None,
                on_knights_depleted: None,
                on_pikemen_depleted: None,
                on_crossbowmen_depleted: None,
            },
            Self::SomeIq => StrategyProfile {
                knight: TroopStrategy::SomeiqKnight,
                pikeman: TroopStrategy::SomeiqPikeman,
                crossbowman: TroopStrategy::SomeiqCrossbowman,
                start: Some(StartStrategy::SacrificeHandler { edge: crate::math::Vec2::ZERO }),
                on_knights_depleted: Some(DepletionHandler::SwitchToOmniscientAll),
                on_pikemen_depleted: Some(DepletionHandler::SwitchToOmniscientAll),
                on_crossbowmen_depleted: Some(DepletionHandler::SwitchToOmniscientAll),
            },
            Self::Rpc => StrategyProfile {
                knight: TroopStrategy::simple(UnitType::Crossbowman, UnitType::Pikeman)
                    .expect("Knight's favorite and hated types are distinct by construction"),
                crossbowman: TroopStrategy::simple(UnitType::Pikeman, UnitType::Knight)
                    .expect("Crossbowman's favorite and hated types are distinct by construction"),
                pikeman: TroopStrategy::simple(UnitType::Knight, UnitType::Crossbowman)
                    .expect("Pikeman's favorite and hated types are distinct by construction"),
                start: None,
                on_knights_depleted: None,
                on_pikemen_depleted: None,
                on_crossbowmen_depleted: None,
            },
            Self::RandomIq => StrategyProfile {
                knight: TroopStrategy::RandomPerUnit { unit_type: UnitType::Knight },
                pikeman: TroopStrategy::RandomPerUnit { unit_type: UnitType::Pikeman },
                crossbowman: TroopStrategy::RandomPerUnit { unit_type: UnitType::Crossbowman },
                start: None,
                on_knights_depleted: None,
                on_pikemen_depleted: None,
                on_crossbowmen_depleted: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderManager;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn uid(index: u32) -> UnitId {
        UnitId { index, generation: 0 }
    }

    #[test]
    fn simple_rejects_equal_favorite_and_hated() {
        let result = TroopStrategy::simple(UnitType::Knight, UnitType::Knight);
        assert!(result.is_err());
    }

    #[test]
    fn braindead_installs_one_priority_zero_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut orders = OrderManager::new();
        TroopStrategy::Braindead.apply(&mut rng, &mut orders, uid(0));
        assert_eq!(orders.len(), 1);
    }

    #[test]
    fn someiq_crossbowman_installs_three_orders() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut orders = OrderManager::new();
        TroopStrategy::SomeiqCrossbowman.apply(&mut rng, &mut orders, uid(0));
        assert_eq!(orders.len(), 3);
    }

    #[test]
    fn random_per_unit_installs_one_of_the_named_strategies_wiring() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut orders = OrderManager::new();
        TroopStrategy::RandomPerUnit { unit_type: UnitType::Knight }.apply(&mut rng, &mut orders, uid(0));
        // Every named strategy installs at least one order for Knight (1-3 depending on which was rolled).
        assert!((1..=3).contains(&orders.len()));
    }

    #[test]
    fn random_iq_resolves_independently_per_unit() {
        // Same profile, many units: each unit's installed order count should
        // not be forced to agree, since each rolls its own strategy.
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let profile = StrategyName::RandomIq.build(&mut rng);
        let counts: Vec<usize> = (0..20)
            .map(|i| {
                let mut orders = OrderManager::new();
                profile.for_type(UnitType::Knight).apply(&mut rng, &mut orders, uid(i));
                orders.len()
            })
            .collect();
        assert!(counts.iter().all(|&c| (1..=3).contains(&c)));
        assert!(counts.iter().any(|&c| c != counts[0]), "20 independent rolls should not all pick the same strategy");
    }

    #[test]
    fn strategy_name_parse_is_case_insensitive() {
        assert!(matches!(StrategyName::parse("daft").unwrap(), StrategyName::Daft));
        assert!(matches!(StrategyName::parse("DAFT").unwrap(), StrategyName::Daft));
    }

    #[test]
    fn strategy_name_parse_rejects_unknown() {
        assert!(StrategyName::parse("NOPE").is_err());
    }

    #[test]
    fn rpc_cycle_is_knight_crossbow_crossbow_pike_pike_knight() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let profile = StrategyName::Rpc.build(&mut rng);
        match profile.knight {
            TroopStrategy::Simple { favorite, hated } => {
                assert_eq!(favorite, UnitType::Crossbowman);
                assert_eq!(hated, UnitType::Pikeman);
            }
            _ => panic!("expected Simple"),
        }
    }

    #[test]
    fn sacrifice_handler_installs_at_enforce_priority() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let start = StartStrategy::SacrificeHandler { edge: crate::math::Vec2::ZERO };
        let mut installed = Vec::new();
        start.apply(&mut rng, &[uid(3)], |unit, order, priority| installed.push((unit, order, priority)));
        assert_eq!(installed.len(), 1);
        assert_eq!(installed[0].0, uid(3));
        assert_eq!(installed[0].2, crate::order::ENFORCE_PRIORITY);
    }

    #[test]
    fn sacrifice_handler_noop_on_empty_candidates() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let start = StartStrategy::SacrificeHandler { edge: crate::math::Vec2::ZERO };
        let mut installed = Vec::new();
        start.apply(&mut rng, &[], |unit, order, priority| installed.push((unit, order, priority)));
        assert!(installed.is_empty());
    }
}
