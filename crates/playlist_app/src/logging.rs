//! Logger setup for the binary: terminal output plus an optional log file.

use std::fs::File;
use std::path::Path;

use engine_logging::Verbosity;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub fn initialize(verbosity: Verbosity, log_file: Option<&Path>) {
    let level = verbosity.level_filter();
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = log_file {
        match File::create(path) {
            // The file always gets the detailed log regardless of --quiet.
            Ok(file) => loggers.push(WriteLogger::new(
                level.max(log::LevelFilter::Debug),
                config,
                file,
            )),
            Err(err) => {
                eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            }
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(log::LevelFilter::Error)
        .build()
}
