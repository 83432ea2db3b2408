//! Headless battle runner binary.
//!
//! ```bash
//! bg_runner run classic DAFT SOMEIQ --units 20
//! bg_runner tourney --generals DAFT SOMEIQ RPC --scenarios classic testudo --scenario-units 20 20 -N 10
//! bg_runner plot --ai DAFT --scenario-params knight 5 --range-params 5 10 20 40
//! bg_runner load scenario.ron
//! ```

use bg_runner::cli::{cmd_load, cmd_plot, cmd_run, cmd_tourney, init_logging};
use bg_runner::{Cli, Commands, RunnerConfig};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match RunnerConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_output_dir_override(cli.output.clone()),
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "invalid configuration");
        eprintln!("error: {e}");
        std::process::exit(2);
    }

    let result = match cli.command {
        Commands::Run { scenario_name, general_a, general_b, units, terminal, data_file } => {
            cmd_run(&config, cli.seed, &cli.output, scenario_name, general_a, general_b, units, terminal, data_file)
        }
        Commands::Tourney { generals, scenarios, scenario_units, rounds, no_alternate } => {
            cmd_tourney(&config, cli.seed, &cli.output, generals, scenarios, scenario_units, rounds, no_alternate)
        }
        Commands::Plot { ai, plotter: _, scenario_params, range_params, reps, stats: _ } => {
            cmd_plot(&config, cli.seed, &cli.output, ai, scenario_params, range_params, reps)
        }
        Commands::Load { savefile } => cmd_load(&config, &cli.output, savefile),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
