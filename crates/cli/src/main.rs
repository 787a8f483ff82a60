//! buildwise command-line interface

mod cli;
mod commands;
mod errors;
mod tracing;

use crate::cli::Cli;
use crate::errors::EXIT_USAGE;
use crate::tracing::{TracingConfig, init_tracing};
use clap::Parser;
use std::process::ExitCode;

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..TracingConfig::default()
    };
    if let Err(err) = init_tracing(tracing_config) {
        eprintln!("{err:?}");
        return ExitCode::from(EXIT_USAGE);
    }

    match commands::execute(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            ExitCode::from(code)
        }
    }
}
