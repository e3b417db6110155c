//! nativelog: parse native test binary output into structured results
//!
//! Reads captured console output (gtest listings, stress logs, benchmark
//! summaries) from a file or stdin and prints the parsed run as JSON.

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::{error, info};

use nativelog::commands::{execute, read_input};
use nativelog::config::Config;

fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    config.validate()?;

    let Some(command) = config.command.as_ref() else {
        Config::command().print_help()?;
        return Ok(ExitCode::from(2));
    };

    let text = read_input(command.input(), io::stdin().lock())?;
    info!(bytes = text.len(), format = ?command.format(), "Parsing input");

    match execute(&config, command, &text, io::stdout().lock()) {
        Ok(result) if result.is_failed() => {
            error!(run = %result.name, "Run reported failures");
            Ok(ExitCode::FAILURE)
        }
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => Err(e.into()),
    }
}
