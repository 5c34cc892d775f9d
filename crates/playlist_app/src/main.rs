mod cli;
mod config;
mod logging;
mod run;
mod state;

use std::process::ExitCode;

use clap::Parser;
use engine_logging::{engine_error, Verbosity};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::initialize(
        Verbosity::from_flags(cli.quiet, cli.verbose),
        cli.log_file.as_deref(),
    );

    match run::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
