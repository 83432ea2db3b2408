//! Canonical stat blocks for the three concrete unit types.
//!
//! The scenario builder and the Lanchester builder both consult this one
//! table rather than hard-coding numbers at each formation call site.

use std::collections::HashMap;

use crate::unit::{DamageKind, UnitType};

/// The numeric stat block for one unit type, independent of position/team/identity.
#[derive(Debug, Clone)]
pub struct UnitStats {
    /// Maximum hit points.
    pub max_hp: i32,
    /// Armor per damage kind.
    pub armor: HashMap<DamageKind, i32>,
    /// Attack per damage kind.
    pub attack: HashMap<DamageKind, i32>,
    /// Attack reach; 0 for pure melee.
    pub range: f64,
    /// Sight radius; always `>= range`.
    pub sight: f64,
    /// Collision radius.
    pub size: f64,
    /// Max distance moved per tick.
    pub speed: f64,
    /// Accuracy multiplier in `[0, 1]`.
    pub accuracy: f64,
    /// Reload duration in reload-bookkeeping time units.
    pub reload_time: f64,
}

/// Look up the canonical stat block for a concrete unit type.
///
/// # Panics
///
/// Panics if called with `UnitType::All` or `UnitType::None`, which are
/// query selectors and never backed by a stat block; callers that hold a
/// `UnitType` coming from user/scenario input should reject those two
/// variants before reaching this function.
#[must_use]
pub fn base_stats(unit_type: UnitType) -> UnitStats {
    match unit_type {
        UnitType::Knight => UnitStats {
            max_hp: 120,
            armor: HashMap::from([(DamageKind::Slash, 6), (DamageKind::Pierce, 4), (DamageKind::Blunt, 2)]),
            attack: HashMap::from([(DamageKind::Slash, 14), (DamageKind::Blunt, 4)]),
            range: 0.0,
            sight: 18.0,
            size: 1.2,
            speed: 2.2,
            accuracy: 0.9,
            reload_time: 6.0,
        },
        UnitType::Pikeman => UnitStats {
            max_hp: 90,
            armor: HashMap::from([(DamageKind::Slash, 3), (DamageKind::Pierce, 2)]),
            attack: HashMap::from([(DamageKind::Pierce, 18)]),
            range: 1.5,
            sight: 16.0,
            size: 0.9,
            speed: 1.6,
            accuracy: 0.85,
            reload_time: 8.0,
        },
        UnitType::Crossbowman => UnitStats {
            max_hp: 60,
            armor: HashMap::from([(DamageKind::Slash, 1)]),
            attack: HashMap::from([(DamageKind::Pierce, 16)]),
            range: 12.0,
            sight: 20.0,
            size: 0.8,
            speed: 1.8,
            accuracy: 0.75,
            reload_time: 14.0,
        },
        UnitType::All | UnitType::None => {
            panic!("base_stats called with a query selector ({unit_type:?}), not a concrete unit type")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_concrete_type_has_stats() {
        for t in UnitType::CONCRETE {
            let s = base_stats(t);
            assert!(s.max_hp > 0);
            assert!(s.sight >= s.range);
            assert!(s.speed > 0.0);
        }
    }

    #[test]
    #[should_panic]
    fn all_selector_has_no_stats() {
        base_stats(UnitType::All);
    }
}
