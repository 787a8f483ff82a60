pub mod analyze;
pub mod catalog;
pub mod schedule;
pub mod simulate;

use crate::cli::{Cli, Commands, OutputArgs, SimulationArgs};
use crate::errors::CliError;
use buildwise_core::{EngineConfig, SimulationOptions};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, instrument};

/// Run the parsed command and return what should be printed on stdout.
#[instrument(name = "buildwise_command", skip_all, fields(correlation_id = %crate::tracing::correlation_id()))]
pub fn execute(cli: &Cli) -> Result<String, CliError> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Analyze(args) => analyze::execute(&config, args),
        Commands::Schedule { area, output } => schedule::execute(&config, *area, *output),
        Commands::Simulate {
            area,
            deadline,
            simulation,
            output,
        } => simulate::execute(&config, *area, *deadline, *simulation, *output),
        Commands::Catalog => catalog::execute(&config),
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    match path {
        Some(path) => Ok(EngineConfig::from_path(path)?),
        None => {
            debug!("No configuration file, using the standard catalog");
            Ok(EngineConfig::default())
        }
    }
}

/// Apply command-line overrides on top of the configured simulation options.
fn simulation_options(config: &EngineConfig, args: SimulationArgs) -> SimulationOptions {
    SimulationOptions {
        trials: args.trials.unwrap_or(config.simulation.trials),
        seed: args.seed.or(config.simulation.seed),
    }
}

fn render_json<T: Serialize>(value: &T, output: OutputArgs) -> Result<String, CliError> {
    let rendered = if output.pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| CliError::output("json", e))
}
