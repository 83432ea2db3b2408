//! Round-robin tournament driver (`SPEC_FULL.md` §4.6).
//!
//! Runs every (scenario, generalA, generalB) combination — including
//! reflexive (G, G) pairs — for a fixed number of rounds, optionally
//! alternating which physical side each logical general plays to cancel out
//! positional bias, and aggregates win rates, per-pair and per-scenario
//! matrices, and a reflexive-bias row.

use std::collections::HashMap;

use bg_core::prelude::*;
use bg_core::strategy::StrategyName;
use bg_core::unit::UnitType;
use serde::{Deserialize, Serialize};

use crate::batch::run_parallel;
use crate::error::{Result, RunnerError};

/// A named scenario the tournament or sweep driver can build fresh, on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioSpec {
    /// A formation layout with `units_per_team` units on each side.
    Formation {
        /// Which formation.
        tag: FormationTag,
        /// Units per side.
        units_per_team: u32,
    },
    /// The specialized N-vs-2N Lanchester builder.
    Lanchester {
        /// Which unit type fights in this scenario.
        unit_type: UnitType,
        /// `n` on the smaller side.
        n: u32,
    },
}

impl ScenarioSpec {
    /// Parse a `(scenario, param)` CLI pair (`SPEC_FULL.md` §6's
    /// `--scenario-params SCENARIO PARAM`). `scenario` is a formation name or
    /// `"lanchester-knight"`/`"lanchester-pikeman"`/`"lanchester-crossbowman"`;
    /// `param` is the unit count (`units_per_team` or `n`).
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidArgument`] if `scenario` isn't
    /// recognized or `param` doesn't parse as a positive integer.
    pub fn parse(scenario: &str, param: &str) -> Result<Self> {
        let count: u32 = param.parse().map_err(|_| RunnerError::InvalidArgument {
            name: "param".to_string(),
            message: format!("'{param}' is not a positive integer"),
        })?;
        if count == 0 {
            return Err(RunnerError::InvalidArgument { name: "param".to_string(), message: "must be at least 1".to_string() });
        }

        match scenario {
            "lanchester-knight" => Ok(Self::Lanchester { unit_type: UnitType::Knight, n: count }),
            "lanchester-pikeman" => Ok(Self::Lanchester { unit_type: UnitType::Pikeman, n: count }),
            "lanchester-crossbowman" => Ok(Self::Lanchester { unit_type: UnitType::Crossbowman, n: count }),
            other => {
                let tag = FormationTag::parse(other)?;
                Ok(Self::Formation { tag, units_per_team: count })
            }
        }
    }

    /// Stable display name, used as the `scenario` field of [`MatchResult`]
    /// and the sweep table's `unit_type`/`n_value` grouping key.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Formation { tag, units_per_team } => format!("{tag:?}-{units_per_team}"),
            Self::Lanchester { unit_type, n } => format!("lanchester-{unit_type:?}-{n}"),
        }
    }

    fn build(&self, profile_a: StrategyProfile, profile_b: StrategyProfile, seed: u64) -> bg_core::error::Result<Scenario> {
        match *self {
            Self::Formation { tag, units_per_team } => build(tag, units_per_team, profile_a, profile_b, seed),
            Self::Lanchester { unit_type, n } => build_lanchester(unit_type, n, profile_a, profile_b, seed),
        }
    }
}

/// Which logical general (not physical battlefield side) a match field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchSide {
    /// The general passed first to [`run_tournament`]'s pairing.
    A,
    /// The general passed second.
    B,
}

/// Outcome of one tournament match, in terms of the logical generals rather
/// than the physical battlefield side they happened to occupy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The logical "A" general's strategy.
    pub general_a: StrategyName,
    /// The logical "B" general's strategy.
    pub general_b: StrategyName,
    /// Which scenario this match was played on.
    pub scenario: String,
    /// Winning logical general, or `None` on a draw.
    pub winner: Option<MatchSide>,
    /// Ticks the battle ran.
    pub ticks: u64,
    /// Logical A's survivor count.
    pub survivors_a: u32,
    /// Logical B's survivor count.
    pub survivors_b: u32,
    /// Logical A's casualty count.
    pub casualties_a: u32,
    /// Logical B's casualty count.
    pub casualties_b: u32,
    /// Whether the match was a draw.
    pub is_draw: bool,
    /// Whether this match failed to produce a usable result and was recorded
    /// as a zero-weight draw (`SPEC_FULL.md` §7).
    pub failed: bool,
}

/// Tournament configuration.
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    /// Every general competing, including self-play.
    pub generals: Vec<StrategyName>,
    /// Every scenario to run each pairing on.
    pub scenarios: Vec<ScenarioSpec>,
    /// Matches per (scenario, generalA, generalB) pairing.
    pub rounds: u32,
    /// Swap which physical side each logical general plays on odd rounds.
    pub alternate_positions: bool,
    /// Base seed; match `k`'s seed is `base_seed.wrapping_add(k)`.
    pub base_seed: u64,
    /// Worker-pool size (`0` = pool default).
    pub worker_count: usize,
}

/// One match job, fully self-contained so [`run_parallel`] workers never
/// share unit state (`SPEC_FULL.md` §5).
struct MatchJob {
    scenario_spec: ScenarioSpec,
    general_a: StrategyName,
    general_b: StrategyName,
    swapped: bool,
    seed: u64,
}

fn run_match(job: MatchJob) -> MatchResult {
    let scenario_label = job.scenario_spec.label();

    // `swapped`: logical A plays physical Team B and vice versa, so the
    // reported winner/survivors/casualties get mapped back to logical sides.
    let (phys_a_strategy, phys_b_strategy) = if job.swapped { (job.general_b, job.general_a) } else { (job.general_a, job.general_b) };

    let mut rng_a = bg_core::scenario::rng_for_seed(job.seed);
    let mut rng_b = bg_core::scenario::rng_for_seed(job.seed.wrapping_add(1));
    let profile_a = phys_a_strategy.build(&mut rng_a);
    let profile_b = phys_b_strategy.build(&mut rng_b);

    let scenario = match job.scenario_spec.build(profile_a, profile_b, job.seed) {
        Ok(scenario) => scenario,
        Err(_) => {
            return MatchResult {
                general_a: job.general_a,
                general_b: job.general_b,
                scenario: scenario_label,
                winner: None,
                ticks: 0,
                survivors_a: 0,
                survivors_b: 0,
                casualties_a: 0,
                casualties_b: 0,
                is_draw: true,
                failed: true,
            };
        }
    };

    let result = run(scenario, Pacing::Unlocked, None, None);

    let (survivors_a, survivors_b, casualties_a, casualties_b) = if job.swapped {
        (result.team_b.survivor_count, result.team_a.survivor_count, result.team_b.casualties, result.team_a.casualties)
    } else {
        (result.team_a.survivor_count, result.team_b.survivor_count, result.team_a.casualties, result.team_b.casualties)
    };

    let winner = match result.winner {
        BattleWinner::A => Some(if job.swapped { MatchSide::B } else { MatchSide::A }),
        BattleWinner::B => Some(if job.swapped { MatchSide::A } else { MatchSide::B }),
        BattleWinner::Draw => None,
    };

    MatchResult {
        general_a: job.general_a,
        general_b: job.general_b,
        scenario: scenario_label,
        winner,
        ticks: result.ticks,
        survivors_a,
        survivors_b,
        casualties_a,
        casualties_b,
        is_draw: winner.is_none(),
        failed: false,
    }
}

/// Aggregated tournament output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    /// Every match played, in dispatch order.
    pub matches: Vec<MatchResult>,
    /// Overall win rate per general, across every match it played on either side.
    pub win_rates: HashMap<StrategyName, f64>,
    /// Win rate of generalA over generalB, aggregated across all scenarios.
    /// Keyed by `"{generalA:?}/{generalB:?}"` (tuple keys aren't valid JSON
    /// object keys, so this stays a flat string rather than `(A, B)`).
    pub pair_matrix: HashMap<String, f64>,
    /// Win rate of generalA over generalB restricted to one scenario, keyed
    /// by `"{scenario}/{generalA:?}/{generalB:?}"`.
    pub scenario_matrix: HashMap<String, f64>,
    /// For each general, its win rate in reflexive (self, self) matches minus
    /// 0.5 — a nonzero value indicates first-mover/positional bias.
    pub reflexive_bias: HashMap<StrategyName, f64>,
    /// Matches that failed to construct and were recorded as zero-weight draws.
    pub failed_count: u32,
}

/// Run every (scenario, generalA, generalB) pairing `config.rounds` times and
/// aggregate the results.
///
/// Matches are embarrassingly parallel (`SPEC_FULL.md` §5): each builds its
/// own scenario and runs independently on a worker-pool thread.
#[must_use]
pub fn run_tournament(config: &TournamentConfig) -> TournamentReport {
    let mut jobs = Vec::new();
    let mut seed_counter = 0u64;

    for &scenario_spec in &config.scenarios {
        for &general_a in &config.generals {
            for &general_b in &config.generals {
                for round in 0..config.rounds {
                    let swapped = config.alternate_positions && round % 2 == 1;
                    let seed = config.base_seed.wrapping_add(seed_counter);
                    seed_counter += 1;
                    jobs.push(MatchJob { scenario_spec, general_a, general_b, swapped, seed });
                }
            }
        }
    }

    let matches = run_parallel(jobs, config.worker_count, run_match);
    aggregate(matches)
}

fn pair_key(general_a: StrategyName, general_b: StrategyName) -> String {
    format!("{general_a:?}/{general_b:?}")
}

fn scenario_key(scenario: &str, general_a: StrategyName, general_b: StrategyName) -> String {
    format!("{scenario}/{general_a:?}/{general_b:?}")
}

fn aggregate(matches: Vec<MatchResult>) -> TournamentReport {
    let failed_count = matches.iter().filter(|m| m.failed).count() as u32;

    let mut win_counts: HashMap<StrategyName, (u32, u32)> = HashMap::new();
    let mut pair_counts: HashMap<String, (u32, u32)> = HashMap::new();
    let mut scenario_counts: HashMap<String, (u32, u32)> = HashMap::new();
    let mut reflexive_counts: HashMap<StrategyName, (u32, u32)> = HashMap::new();

    for m in &matches {
        if m.failed {
            continue;
        }
        let a_won = m.winner == Some(MatchSide::A);
        let b_won = m.winner == Some(MatchSide::B);

        let a_entry = win_counts.entry(m.general_a).or_default();
        a_entry.1 += 1;
        if a_won {
            a_entry.0 += 1;
        }
        let b_entry = win_counts.entry(m.general_b).or_default();
        b_entry.1 += 1;
        if b_won {
            b_entry.0 += 1;
        }

        let pair_entry = pair_counts.entry(pair_key(m.general_a, m.general_b)).or_default();
        pair_entry.1 += 1;
        if a_won {
            pair_entry.0 += 1;
        }

        let scenario_entry = scenario_counts.entry(scenario_key(&m.scenario, m.general_a, m.general_b)).or_default();
        scenario_entry.1 += 1;
        if a_won {
            scenario_entry.0 += 1;
        }

        if m.general_a == m.general_b {
            let reflexive_entry = reflexive_counts.entry(m.general_a).or_default();
            reflexive_entry.1 += 1;
            if a_won {
                reflexive_entry.0 += 1;
            }
        }
    }

    let rate = |(wins, total): (u32, u32)| if total == 0 { 0.0 } else { f64::from(wins) / f64::from(total) };

    TournamentReport {
        matches,
        win_rates: win_counts.into_iter().map(|(k, v)| (k, rate(v))).collect(),
        pair_matrix: pair_counts.into_iter().map(|(k, v)| (k, rate(v))).collect(),
        scenario_matrix: scenario_counts.into_iter().map(|(k, v)| (k, rate(v))).collect(),
        reflexive_bias: reflexive_counts.into_iter().map(|(k, v)| (k, rate(v) - 0.5)).collect(),
        failed_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_spec_parses_formation_and_lanchester() {
        assert_eq!(ScenarioSpec::parse("classic", "10").unwrap(), ScenarioSpec::Formation { tag: FormationTag::Classic, units_per_team: 10 });
        assert_eq!(
            ScenarioSpec::parse("lanchester-knight", "5").unwrap(),
            ScenarioSpec::Lanchester { unit_type: UnitType::Knight, n: 5 }
        );
    }

    #[test]
    fn scenario_spec_rejects_zero_and_unknown() {
        assert!(ScenarioSpec::parse("classic", "0").is_err());
        assert!(ScenarioSpec::parse("nonsense", "10").is_err());
    }

    #[test]
    fn reflexive_someiq_win_rate_near_half() {
        let config = TournamentConfig {
            generals: vec![StrategyName::SomeIq],
            scenarios: vec![ScenarioSpec::Formation { tag: FormationTag::Classic, units_per_team: 20 }],
            rounds: 20,
            alternate_positions: true,
            base_seed: 0,
            worker_count: 2,
        };
        let report = run_tournament(&config);
        assert_eq!(report.matches.len(), 20);
        assert_eq!(report.failed_count, 0);
        let a_wins = report.matches.iter().filter(|m| m.winner == Some(MatchSide::A)).count();
        assert!((8..=12).contains(&a_wins), "expected 8-12 A wins out of 20, got {a_wins}");
    }

    #[test]
    fn includes_reflexive_pairs_and_computes_bias() {
        let config = TournamentConfig {
            generals: vec![StrategyName::Daft, StrategyName::Braindead],
            scenarios: vec![ScenarioSpec::Lanchester { unit_type: UnitType::Knight, n: 5 }],
            rounds: 2,
            alternate_positions: false,
            base_seed: 1,
            worker_count: 2,
        };
        let report = run_tournament(&config);
        // 2 generals x 2 generals x 2 rounds = 8 matches, including (Daft,Daft) and (Braindead,Braindead).
        assert_eq!(report.matches.len(), 8);
        assert!(report.reflexive_bias.contains_key(&StrategyName::Daft));
        assert!(report.reflexive_bias.contains_key(&StrategyName::Braindead));
    }

    #[test]
    fn failed_match_is_recorded_as_zero_weight_draw() {
        let job = MatchJob {
            scenario_spec: ScenarioSpec::Formation { tag: FormationTag::Classic, units_per_team: 0 },
            general_a: StrategyName::Daft,
            general_b: StrategyName::Daft,
            swapped: false,
            seed: 0,
        };
        let result = run_match(job);
        assert!(result.failed);
        assert!(result.is_draw);
        assert_eq!(result.winner, None);
    }
}
