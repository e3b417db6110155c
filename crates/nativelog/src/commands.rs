//! Subcommand implementations
//!
//! Each subcommand parses one block of captured output into a [`RunResult`],
//! writes it as JSON, and optionally checks its metrics.

use std::io::{Read, Write};
use std::path::Path;

use nativelog_device::{RunError, benchmark_average, verify_stress_iterations};
use nativelog_parsers::{
    GTestListParser, NativeBenchmarkParser, NativeStressParser, OutputParser, ParseError,
    ProtocolError, RunCollector, RunResult, line_chunks,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{Command, Config, OutputFormat};

/// Errors from running a subcommand
#[derive(Debug, Error)]
pub enum CommandError {
    /// Reading input or writing output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the result failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input was rejected by the parser
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The parser produced an incomplete run
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A verification check failed
    #[error("Verification failed: {0}")]
    Verify(#[from] RunError),

    /// The parser produced no run at all
    #[error("No run was reported")]
    NoRun,

    /// The benchmark output never printed its summary line
    #[error("No benchmark summary line found for run {run}")]
    NoBenchmarkSummary {
        /// Run name
        run: String,
    },
}

/// Read the whole input from a file, or from `stdin` when no path is given
///
/// # Errors
///
/// Returns `CommandError::Io` if reading fails.
pub fn read_input(path: Option<&Path>, mut stdin: impl Read) -> Result<String, CommandError> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            stdin.read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Parse `text` in the given format into a single run
///
/// # Errors
///
/// Returns `CommandError::Parse` for malformed gtest listings.
pub fn parse_text(
    format: OutputFormat,
    run_name: &str,
    text: &str,
    chunk_lines: usize,
) -> Result<RunResult, CommandError> {
    match format {
        OutputFormat::GtestList => {
            collect(feed_chunks(GTestListParser::new(run_name), text, chunk_lines))
        }
        OutputFormat::Stress => {
            collect(feed_chunks(NativeStressParser::new(run_name), text, chunk_lines))
        }
        OutputFormat::Benchmark => collect(feed_chunks(
            NativeBenchmarkParser::new(run_name),
            text,
            chunk_lines,
        )),
    }
}

fn feed_chunks<P: OutputParser>(mut parser: P, text: &str, chunk_lines: usize) -> P {
    let mut chunks = 0usize;
    for lines in line_chunks(text, chunk_lines) {
        parser.feed(lines);
        chunks += 1;
    }
    debug!(chunks, "Fed input to parser");
    parser
}

fn collect<P: OutputParser>(parser: P) -> Result<RunResult, CommandError> {
    let mut collector = RunCollector::new();
    parser.finalize(&mut collector)?;
    collector
        .finish()?
        .into_iter()
        .next()
        .ok_or(CommandError::NoRun)
}

/// Execute `command` against already-read input, writing JSON to `out`
///
/// The result is written before verification, so a failing check still
/// leaves the parsed run on stdout.
///
/// # Errors
///
/// Returns `CommandError` if parsing, writing, or verification fails.
pub fn execute(
    config: &Config,
    command: &Command,
    text: &str,
    mut out: impl Write,
) -> Result<RunResult, CommandError> {
    let run_name = command.run_name();
    let (result, summary_seen) = match command {
        Command::VerifyBenchmark { .. } => {
            let parser = feed_chunks(
                NativeBenchmarkParser::new(run_name.as_str()),
                text,
                config.chunk_lines(),
            );
            let seen = parser.has_summary();
            (collect(parser)?, seen)
        }
        _ => (
            parse_text(command.format(), &run_name, text, config.chunk_lines())?,
            true,
        ),
    };

    if config.pretty {
        serde_json::to_writer_pretty(&mut out, &result)?;
    } else {
        serde_json::to_writer(&mut out, &result)?;
    }
    writeln!(out)?;

    match command {
        Command::Parse { .. } => {}
        Command::VerifyStress { expected, .. } => {
            let completed = verify_stress_iterations(&result, *expected)?;
            info!(run = %run_name, completed, "Stress verification passed");
        }
        Command::VerifyBenchmark { .. } => {
            if !summary_seen {
                return Err(CommandError::NoBenchmarkSummary { run: run_name });
            }
            let average = benchmark_average(&result)?;
            info!(run = %run_name, average, "Benchmark verification passed");
        }
    }
    Ok(result)
}
