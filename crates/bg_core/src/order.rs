//! The order system: a closed, tagged-variant vocabulary of per-unit commands,
//! and the priority-ordered container that holds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::math::Vec2;
use crate::unit::{UnitId, UnitType};

/// The priority reserved for the "enforce" slot. At most one order may occupy
/// it; while occupied, no other order in the manager is ever tried.
pub const ENFORCE_PRIORITY: i64 = -1;

/// The closed set of order variants.
///
/// Every variant implements the one-tick contract via [`Order::try_tick`]:
/// at most one atomic unit of progress per call, never a loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderKind {
    /// Drive toward `target`; completes when position matches.
    Move {
        /// Destination.
        target: Vec2,
    },
    /// `steps_remaining` stepped moves along a world-space `direction_degrees`.
    MoveByStep {
        /// Steps left to take.
        steps_remaining: u32,
        /// World-space bearing in degrees.
        direction_degrees: f64,
    },
    /// Alternating zero-net movement, decrementing `remaining` each invocation.
    ///
    /// Preserves the original's ambiguous "fake movement" behavior rather
    /// than inventing new semantics for it (see `DESIGN.md`).
    DontMove {
        /// Invocations left.
        remaining: u32,
        /// Alternates sign each call; only its sign is observable.
        sign: f64,
    },
    /// Attack an enemy matching `selector` if one is already in range. Never completes.
    AttackOnReach {
        /// Target-type filter.
        selector: UnitType,
    },
    /// Attack the nearest in-sight enemy matching `selector`, closing distance
    /// if not yet in range. Never completes.
    AttackOnSight {
        /// Target-type filter.
        selector: UnitType,
    },
    /// As `AttackOnSight` but ignores the sight radius. Never completes.
    AttackNearestOmniscient {
        /// Target-type filter.
        selector: UnitType,
    },
    /// Step directly away from a selector-matching enemy that is within sight
    /// and within its own attack range of this unit. Never completes.
    Avoid {
        /// Target-type filter.
        selector: UnitType,
    },
    /// Move toward the nearest matching friendly if none is in sight. Never completes.
    StayInFriendlySpace {
        /// Friendly-type filter.
        selector: UnitType,
    },
    /// Move toward `target` while it is out of reach. Never completes.
    StayInReach {
        /// The unit to stay in reach of.
        target: UnitId,
    },
    /// Permanent enforce-slot order: drive toward `edge`, ignoring everything
    /// else. Never completes.
    Sacrifice {
        /// Designated board edge to march toward.
        edge: Vec2,
    },
    /// Take a slot on a ring of the given radius around `members`' centroid.
    /// Completes when on slot.
    Formation {
        /// Ring radius around the centroid.
        ring_radius: f64,
        /// All units participating in this formation (including self),
        /// in a fixed order that determines slot assignment.
        members: Vec<UnitId>,
    },
}

/// An order: the owning unit, an optional squad tag, and the behavior itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// The unit this order drives.
    pub unit: UnitId,
    /// Optional squad grouping; `remove_squad_orders` clears any order with `Some`.
    pub squad_id: Option<u32>,
    /// The behavior.
    pub kind: OrderKind,
}

impl Order {
    /// Construct a new order for `unit` with no squad tag.
    #[must_use]
    pub fn new(unit: UnitId, kind: OrderKind) -> Self {
        Self { unit, squad_id: None, kind }
    }

    /// Construct a new order for `unit` tagged with `squad_id`.
    #[must_use]
    pub fn with_squad(unit: UnitId, squad_id: u32, kind: OrderKind) -> Self {
        Self { unit, squad_id: Some(squad_id), kind }
    }

    /// Perform one atomic unit of progress.
    ///
    /// Returns `true` when the order is complete and should be removed,
    /// `false` when it remains active. A dangling target (the unit this
    /// order needs no longer resolves) is treated as "still active, nothing
    /// to do this tick" rather than an error.
    pub fn try_tick(&mut self, engine: &mut Engine) -> bool {
        let unit = self.unit;
        match &mut self.kind {
            OrderKind::Move { target } => {
                if engine.position_matches(unit, *target) {
                    return true;
                }
                engine.move_toward(unit, *target);
                false
            }
            OrderKind::MoveByStep { steps_remaining, direction_degrees } => {
                if *steps_remaining == 0 {
                    return true;
                }
                engine.move_one_step_angle(unit, unit, *direction_degrees);
                *steps_remaining -= 1;
                *steps_remaining == 0
            }
            OrderKind::DontMove { remaining, sign } => {
                engine.move_one_step_angle(unit, unit, -90.0 * *sign);
                *sign = -*sign;
                if *remaining == 0 {
                    return true;
                }
                *remaining -= 1;
                false
            }
            OrderKind::AttackOnReach { selector } => {
                if let Some(target) = engine.nearest_enemy_in_reach(unit, *selector) {
                    engine.attack(unit, target);
                }
                false
            }
            OrderKind::AttackOnSight { selector } => {
                let Some(target) = engine.nearest_enemy_in_sight(unit, *selector) else {
                    return false;
                };
                if engine.in_reach(unit, target) {
                    engine.attack(unit, target);
                } else {
                    engine.move_toward_unit(unit, target);
                }
                false
            }
            OrderKind::AttackNearestOmniscient { selector } => {
                let Some(target) = engine.nearest_enemy(unit, *selector) else {
                    return false;
                };
                if engine.in_reach(unit, target) {
                    engine.attack(unit, target);
                } else {
                    engine.move_toward_unit(unit, target);
                }
                false
            }
            OrderKind::Avoid { selector } => {
                let Some(target) = engine.nearest_enemy_in_sight(unit, *selector) else {
                    return false;
                };
                if engine.in_reach(target, unit) {
                    engine.move_one_step_angle(unit, target, 180.0);
                }
                false
            }
            OrderKind::StayInFriendlySpace { selector } => {
                if engine.nearest_friendly_in_sight(unit, *selector).is_none() {
                    if let Some(friendly) = engine.nearest_friendly_any(unit, *selector) {
                        engine.move_toward_unit(unit, friendly);
                    }
                }
                false
            }
            OrderKind::StayInReach { target } => {
                if !engine.in_reach(unit, *target) {
                    engine.move_toward_unit(unit, *target);
                }
                false
            }
            OrderKind::Sacrifice { edge } => {
                engine.move_toward(unit, *edge);
                false
            }
            OrderKind::Formation { ring_radius, members } => {
                let Some(slot) = engine.formation_slot(unit, *ring_radius, members) else {
                    return false;
                };
                if engine.position_matches(unit, slot) {
                    return true;
                }
                engine.move_toward(unit, slot);
                false
            }
        }
    }
}

/// Per-unit container of orders, kept in ascending-priority order.
///
/// Backed by a sorted map rather than a hand-rolled linked list: iteration
/// during mutation is handled by remove-then-reinsert rather than pointer
/// surgery (see `DESIGN.md`'s note on the OrderManager data structure).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderManager {
    orders: BTreeMap<i64, Order>,
}

impl OrderManager {
    /// An empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `order` at `priority`.
    ///
    /// # Errors
    ///
    /// Returns `Err` (the priority is already in use) instead of overwriting;
    /// callers should treat this as an engine-internal anomaly (log and skip).
    pub fn add(&mut self, order: Order, priority: i64) -> Result<(), Order> {
        if self.orders.contains_key(&priority) {
            return Err(order);
        }
        self.orders.insert(priority, order);
        Ok(())
    }

    /// Insert `order` at `max(non-negative priorities) + 1`, or `0` if empty.
    /// Returns the priority it was placed at.
    pub fn add_max_priority(&mut self, order: Order) -> i64 {
        let next = self
            .orders
            .keys()
            .copied()
            .filter(|&p| p >= 0)
            .max()
            .map_or(0, |p| p + 1);
        self.orders.insert(next, order);
        next
    }

    /// Remove and return the order at `priority`, if any.
    pub fn remove_at(&mut self, priority: i64) -> Option<Order> {
        self.orders.remove(&priority)
    }

    /// Clear every order.
    pub fn flush(&mut self) {
        self.orders.clear();
    }

    /// Remove every order carrying a squad tag.
    pub fn remove_squad_orders(&mut self) {
        self.orders.retain(|_, order| order.squad_id.is_none());
    }

    /// Whether an enforce-slot order is present.
    #[must_use]
    pub fn has_enforce(&self) -> bool {
        self.orders.contains_key(&ENFORCE_PRIORITY)
    }

    /// Number of orders currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether the manager holds no orders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate orders in ascending-priority order (enforce first, if present).
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Order)> {
        self.orders.iter().map(|(&p, o)| (p, o))
    }

    /// Advance this unit's orders by one tick: try the head order (the
    /// enforce slot if occupied, otherwise the lowest remaining priority),
    /// remove it if it completed, and do not touch any other order this
    /// tick — the one-tick, at-most-one-order-advances rule.
    pub fn advance(&mut self, engine: &mut Engine) {
        let Some((&priority, _)) = self.orders.iter().next() else {
            return;
        };
        let Some(mut order) = self.orders.remove(&priority) else {
            return;
        };
        let finished = order.try_tick(engine);
        if !finished {
            self.orders.insert(priority, order);
        }
    }
}
