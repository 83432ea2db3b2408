//! CLI surface: `run`, `tourney`, `plot`, `load` (`SPEC_FULL.md` §6).
//!
//! Flag syntax here is this crate's own choice; the spec calls the exact
//! syntax non-binding and only requires the four subcommands and the shared
//! `--seed`/`--verbose`/`--output` flags.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bg_core::prelude::*;
use bg_core::strategy::StrategyName;

use crate::config::RunnerConfig;
use crate::error::{Result, RunnerError};
use crate::sweep::{self, SweepConfig};
use crate::tournament::{self, ScenarioSpec, TournamentConfig};

/// Default units-per-side for a named formation run when `--units` is omitted.
const DEFAULT_UNITS_PER_TEAM: u32 = 20;

#[derive(Parser)]
#[command(name = "bg_runner", about = "Headless battle runner, tournaments, and parameter sweeps", version)]
pub struct Cli {
    /// Raise the tracing level; repeatable (`-v` = DEBUG, `-vv` = TRACE).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Per-battle random seed.
    #[arg(long, global = true, default_value_t = 0)]
    pub seed: u64,

    /// Where to write result records; defaults per-subcommand (stdout for `run`, a results directory otherwise).
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Optional RON configuration file (`SPEC_FULL.md` §6.1).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one battle between two named strategies on a named scenario.
    Run {
        /// Formation name (`classic`, `defensive`, ...) or `lanchester-{knight,pikeman,crossbowman}`.
        scenario_name: String,
        /// Team A's strategy name.
        general_a: String,
        /// Team B's strategy name.
        general_b: String,
        /// Units per side for a formation scenario, or `n` for a Lanchester scenario.
        #[arg(long, default_value_t = DEFAULT_UNITS_PER_TEAM)]
        units: u32,
        /// Print a plain-text summary after the battle (no graphics — rendering is out of scope).
        #[arg(long)]
        terminal: bool,
        /// Load the starting scenario from this RON file instead of building one from `scenario_name`.
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
    /// Round-robin tournament across generals and scenarios.
    Tourney {
        /// Competing strategy names, including self-play.
        #[arg(long, num_args = 1..)]
        generals: Vec<String>,
        /// Scenario names, each paired positionally with `--scenario-units`.
        #[arg(long, num_args = 1..)]
        scenarios: Vec<String>,
        /// Units/`n` for each entry in `--scenarios`, same order and length.
        #[arg(long, num_args = 1..)]
        scenario_units: Vec<u32>,
        /// Matches per pairing.
        #[arg(short = 'N', long, default_value_t = 10)]
        rounds: u32,
        /// Disable position alternation (by default, sides swap on odd rounds to cancel positional bias).
        #[arg(long)]
        no_alternate: bool,
    },
    /// Parameter sweep over the Lanchester builder.
    Plot {
        /// Strategy both sides use.
        #[arg(long)]
        ai: String,
        /// Named output-table shape (selects a row projection, not a graphics backend).
        #[arg(long, default_value = "raw")]
        plotter: String,
        /// `SCENARIO PARAM` pair: unit type name and a single baseline `n` (kept for CLI symmetry with `tourney`; the actual sweep range comes from `--range-params`).
        #[arg(long, num_args = 2)]
        scenario_params: Vec<String>,
        /// `n` values to sweep over.
        #[arg(long, num_args = 1.., value_name = "V")]
        range_params: Vec<u32>,
        /// Repetitions per `n` value.
        #[arg(short = 'N', long, default_value_t = 5)]
        reps: u32,
        /// Print aggregate stats (mean casualties, win rate) alongside the raw table.
        #[arg(long)]
        stats: bool,
    },
    /// Reconstruct and run a battle from a persisted scenario file.
    Load {
        /// Path to a RON-serialized `ScenarioData`.
        savefile: PathBuf,
    },
}

fn tracing_level(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Install the process-wide tracing subscriber: human logs to stderr, leveled
/// by `-v`/`-vv` (`SPEC_FULL.md` §7.1). Stdout is reserved for result payloads.
pub fn init_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(tracing_level(verbosity).to_string()));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

fn write_output(output: &Option<PathBuf>, default_stdout: bool, contents: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| RunnerError::resource(parent, e))?;
            }
            std::fs::write(path, contents).map_err(|e| RunnerError::resource(path, e))
        }
        None if default_stdout => {
            println!("{contents}");
            Ok(())
        }
        None => {
            std::fs::create_dir_all("results").map_err(|e| RunnerError::resource("results", e))?;
            std::fs::write("results/output.json", contents).map_err(|e| RunnerError::resource("results/output.json", e))
        }
    }
}

/// `run` subcommand: build or load one scenario, run it, report the result.
pub fn cmd_run(
    config: &RunnerConfig,
    seed: u64,
    output: &Option<PathBuf>,
    scenario_name: String,
    general_a: String,
    general_b: String,
    units: u32,
    terminal: bool,
    data_file: Option<PathBuf>,
) -> Result<()> {
    let scenario = if let Some(path) = data_file {
        let text = std::fs::read_to_string(&path).map_err(|e| RunnerError::resource(&path, e))?;
        let data = bg_core::persistence::from_ron(&path.to_string_lossy(), &text)?;
        bg_core::persistence::from_data(&data)?
    } else {
        let strategy_a = config.resolve_strategy(&general_a)?;
        let strategy_b = config.resolve_strategy(&general_b)?;
        let spec = ScenarioSpec::parse(&scenario_name, &units.to_string())?;
        let mut rng_a = bg_core::scenario::rng_for_seed(seed);
        let mut rng_b = bg_core::scenario::rng_for_seed(seed.wrapping_add(1));
        let profile_a = strategy_a.build(&mut rng_a);
        let profile_b = strategy_b.build(&mut rng_b);
        match spec {
            ScenarioSpec::Formation { tag, units_per_team } => build(tag, units_per_team, profile_a, profile_b, seed)?,
            ScenarioSpec::Lanchester { unit_type, n } => build_lanchester(unit_type, n, profile_a, profile_b, seed)?,
        }
    };

    let mut scenario = scenario;
    scenario.engine.set_tick_cap(config.default_tick_cap);
    let result = run(scenario, Pacing::Unlocked, None, None);

    if terminal {
        eprintln!(
            "winner={:?} ticks={} team_a(survivors={},casualties={}) team_b(survivors={},casualties={})",
            result.winner, result.ticks, result.team_a.survivor_count, result.team_a.casualties, result.team_b.survivor_count, result.team_b.casualties
        );
    }

    let json = serde_json::to_string_pretty(&result).map_err(|e| RunnerError::JsonParseError { path: PathBuf::from("<result>"), message: e.to_string() })?;
    write_output(output, true, &json)
}

/// `tourney` subcommand: build a [`TournamentConfig`] from CLI flags, run it, report aggregates.
pub fn cmd_tourney(
    config: &RunnerConfig,
    seed: u64,
    output: &Option<PathBuf>,
    generals: Vec<String>,
    scenarios: Vec<String>,
    scenario_units: Vec<u32>,
    rounds: u32,
    no_alternate: bool,
) -> Result<()> {
    if scenarios.len() != scenario_units.len() {
        return Err(RunnerError::InvalidArgument {
            name: "scenario_units".to_string(),
            message: format!("expected {} values (one per --scenarios entry), got {}", scenarios.len(), scenario_units.len()),
        });
    }

    let general_names: std::result::Result<Vec<StrategyName>, _> = generals.iter().map(|n| config.resolve_strategy(n)).collect();
    let general_names = general_names?;

    let scenario_specs: Result<Vec<ScenarioSpec>> =
        scenarios.iter().zip(&scenario_units).map(|(name, units)| ScenarioSpec::parse(name, &units.to_string())).collect();
    let scenario_specs = scenario_specs?;

    let tourney_config = TournamentConfig {
        generals: general_names,
        scenarios: scenario_specs,
        rounds,
        alternate_positions: !no_alternate,
        base_seed: seed,
        worker_count: config.resolved_worker_count(),
    };

    let report = tournament::run_tournament(&tourney_config);
    let json = serde_json::to_string_pretty(&report).map_err(|e| RunnerError::JsonParseError { path: PathBuf::from("<report>"), message: e.to_string() })?;
    write_output(output, false, &json)
}

/// `plot` subcommand: run a Lanchester sweep and emit the raw result table.
pub fn cmd_plot(
    config: &RunnerConfig,
    seed: u64,
    output: &Option<PathBuf>,
    ai: String,
    scenario_params: Vec<String>,
    range_params: Vec<u32>,
    reps: u32,
) -> Result<()> {
    if scenario_params.len() != 2 {
        return Err(RunnerError::InvalidArgument { name: "scenario_params".to_string(), message: "expected exactly SCENARIO PARAM".to_string() });
    }
    let strategy = config.resolve_strategy(&ai)?;
    let unit_type = match scenario_params[0].as_str() {
        "knight" => bg_core::unit::UnitType::Knight,
        "pikeman" => bg_core::unit::UnitType::Pikeman,
        "crossbowman" => bg_core::unit::UnitType::Crossbowman,
        other => return Err(RunnerError::InvalidArgument { name: "scenario_params".to_string(), message: format!("unknown unit type '{other}'") }),
    };

    let n_values = if range_params.is_empty() {
        let baseline: u32 = scenario_params[1].parse().map_err(|_| RunnerError::InvalidArgument {
            name: "scenario_params".to_string(),
            message: format!("'{}' is not a positive integer", scenario_params[1]),
        })?;
        vec![baseline]
    } else {
        range_params
    };

    let sweep_config = SweepConfig { unit_types: vec![unit_type], n_values, repetitions: reps, strategy, base_seed: seed, worker_count: config.resolved_worker_count() };
    let table = sweep::collect(&sweep_config);
    let json = serde_json::to_string_pretty(&table).map_err(|e| RunnerError::JsonParseError { path: PathBuf::from("<sweep>"), message: e.to_string() })?;
    write_output(output, false, &json)
}

/// `load` subcommand: reconstruct a scenario from a savefile and run it.
pub fn cmd_load(config: &RunnerConfig, output: &Option<PathBuf>, savefile: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&savefile).map_err(|e| RunnerError::resource(&savefile, e))?;
    let data = bg_core::persistence::from_ron(&savefile.to_string_lossy(), &text)?;
    let mut scenario = bg_core::persistence::from_data(&data)?;
    scenario.engine.set_tick_cap(config.default_tick_cap);
    let result = run(scenario, Pacing::Unlocked, None, None);
    let json = serde_json::to_string_pretty(&result).map_err(|e| RunnerError::JsonParseError { path: PathBuf::from("<result>"), message: e.to_string() })?;
    write_output(output, true, &json)
}
