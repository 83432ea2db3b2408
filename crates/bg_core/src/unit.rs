//! Unit model: stat block, identity, and the closed unit-type vocabulary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// A side of the battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    /// Team A.
    A,
    /// Team B.
    B,
}

impl Team {
    /// The opposing team.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// The closed set of unit types, plus the two query-only wildcards.
///
/// `ALL` and `NONE` are selectors for spatial queries; they are never
/// assigned to an actual unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    /// Heavy melee cavalry.
    Knight,
    /// Anti-cavalry melee infantry.
    Pikeman,
    /// Ranged infantry.
    Crossbowman,
    /// Matches any concrete type.
    All,
    /// Matches no type.
    None,
}

impl UnitType {
    /// The three instantiable types, in a fixed canonical order.
    pub const CONCRETE: [UnitType; 3] = [UnitType::Knight, UnitType::Pikeman, UnitType::Crossbowman];

    /// Whether `self` (used as a selector) matches a concrete unit's type.
    ///
    /// `All` matches anything, `None` matches nothing, and a concrete
    /// selector matches only itself. `All` and `None` are never passed as
    /// `candidate` for a real unit.
    #[must_use]
    pub fn matches(self, candidate: UnitType) -> bool {
        match self {
            UnitType::All => true,
            UnitType::None => false,
            concrete => concrete == candidate,
        }
    }
}

/// A kind of damage/armor. Attack and armor maps are keyed by this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageKind {
    /// Edged weapons, cut through unarmored flesh.
    Slash,
    /// Point weapons, favored against plate.
    Pierce,
    /// Impact weapons.
    Blunt,
}

/// Stable identity for a unit: an arena index plus a generation counter.
///
/// Orders hold a `UnitId` rather than a direct reference to a unit, so a
/// dead-and-recycled slot is detectable: a lookup with a stale generation
/// means "target gone", which every order contract treats as "still active,
/// try again next tick" rather than a crash (see `DESIGN.md`, cyclic unit
/// references).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    /// Slot index into the arena.
    pub index: u32,
    /// Generation of the slot at allocation time.
    pub generation: u32,
}

/// A single unit on the battlefield.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Stable identity.
    pub id: UnitId,
    /// Which side this unit fights for.
    pub team: Team,
    /// Concrete type (never `All`/`None`).
    pub unit_type: UnitType,
    /// Current position.
    pub position: Vec2,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Current hit points.
    pub hp: i32,
    /// Armor value per damage kind; absent kinds default to 0.
    pub armor: HashMap<DamageKind, i32>,
    /// Attack value per damage kind; absent kinds default to 0.
    pub attack: HashMap<DamageKind, i32>,
    /// Attack reach; 0 for pure melee.
    pub range: f64,
    /// Query radius for sight-based orders; always `>= range`.
    pub sight: f64,
    /// Collision radius.
    pub size: f64,
    /// Maximum distance moved per tick.
    pub speed: f64,
    /// Accuracy multiplier applied to damage, in `[0, 1]`.
    pub accuracy: f64,
    /// Reload duration in reload-bookkeeping time units (see `DEFAULT_TICKS_PER_SECOND`).
    pub reload_time: f64,
    /// Time remaining before this unit may attack again; 0 means ready.
    pub reload_remaining: f64,
    /// Optional squad grouping, used by formation orders and squad-scoped removal.
    pub squad_id: Option<u32>,
    /// Cumulative damage this unit has dealt over the battle.
    pub damage_dealt: i32,
}

impl Unit {
    /// Whether this unit is still alive.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Whether this unit may attack this tick.
    #[must_use]
    pub fn is_reload_ready(&self) -> bool {
        self.reload_remaining <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_matches_any_concrete_type() {
        assert!(UnitType::All.matches(UnitType::Knight));
        assert!(UnitType::All.matches(UnitType::Pikeman));
        assert!(UnitType::All.matches(UnitType::Crossbowman));
    }

    #[test]
    fn none_matches_nothing() {
        assert!(!UnitType::None.matches(UnitType::Knight));
    }

    #[test]
    fn concrete_selector_matches_only_itself() {
        assert!(UnitType::Knight.matches(UnitType::Knight));
        assert!(!UnitType::Knight.matches(UnitType::Pikeman));
    }

    #[test]
    fn team_opponent_is_involutive() {
        assert_eq!(Team::A.opponent(), Team::B);
        assert_eq!(Team::A.opponent().opponent(), Team::A);
    }
}
