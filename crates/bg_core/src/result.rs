//! Battle outcome summary.

use serde::{Deserialize, Serialize};

use crate::engine::Winner;
use crate::unit::Team;

/// Per-team tallies at battle termination.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TeamSummary {
    /// Units this side started with.
    pub initial_count: u32,
    /// Units still alive at termination.
    pub survivor_count: u32,
    /// `initial_count - survivor_count`.
    pub casualties: u32,
    /// Sum of max HP across this side's initial roster.
    pub initial_total_hp: i64,
    /// Sum of current HP across this side's surviving units.
    pub remaining_total_hp: i64,
    /// Sum of damage dealt by this side's units over the battle.
    pub damage_dealt_total: i64,
}

/// The outcome of one battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleResult {
    /// Number of ticks the battle ran before terminating.
    pub ticks: u64,
    /// The winning side, or a draw.
    pub winner: BattleWinner,
    /// Team A's tallies.
    pub team_a: TeamSummary,
    /// Team B's tallies.
    pub team_b: TeamSummary,
}

/// Serializable mirror of [`crate::engine::Winner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleWinner {
    /// Team A won.
    A,
    /// Team B won.
    B,
    /// Neither side was wiped out; draw.
    Draw,
}

impl From<Winner> for BattleWinner {
    fn from(value: Winner) -> Self {
        match value {
            Winner::A => Self::A,
            Winner::B => Self::B,
            Winner::Draw => Self::Draw,
        }
    }
}

impl BattleResult {
    /// Per-team summary for `team`.
    #[must_use]
    pub fn summary_for(&self, team: Team) -> &TeamSummary {
        match team {
            Team::A => &self.team_a,
            Team::B => &self.team_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_conversion_is_faithful() {
        assert_eq!(BattleWinner::from(Winner::A), BattleWinner::A);
        assert_eq!(BattleWinner::from(Winner::B), BattleWinner::B);
        assert_eq!(BattleWinner::from(Winner::Draw), BattleWinner::Draw);
    }

    #[test]
    fn summary_for_selects_matching_team() {
        let result = BattleResult {
            ticks: 10,
            winner: BattleWinner::A,
            team_a: TeamSummary {
                initial_count: 5,
                survivor_count: 3,
                casualties: 2,
                initial_total_hp: 500,
                remaining_total_hp: 300,
                damage_dealt_total: 900,
            },
            team_b: TeamSummary {
                initial_count: 5,
                survivor_count: 0,
                casualties: 5,
                initial_total_hp: 500,
                remaining_total_hp: 0,
                damage_dealt_total: 400,
            },
        };
        assert_eq!(result.summary_for(Team::A).survivor_count, 3);
        assert_eq!(result.summary_for(Team::B).survivor_count, 0);
    }
}
