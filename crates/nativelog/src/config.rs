//! Configuration for the nativelog command line
//!
//! This module provides the argument types for the CLI, including the
//! input source, output format selection, and logging options.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

/// Default number of lines handed to a parser per feed call
pub const DEFAULT_CHUNK_LINES: usize = 500;

/// nativelog - Parse native test binary output into structured results
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nativelog")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Lines fed to the parser per call
    ///
    /// Output is always split on line boundaries. Defaults to 500.
    #[arg(long, global = true, env = "NATIVELOG_CHUNK_LINES")]
    pub chunk_lines: Option<usize>,

    /// Pretty-print the JSON result
    #[arg(long, global = true, default_value = "false")]
    pub pretty: bool,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so they never mix with the JSON result.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,
}

/// Output grammars understood by the parsers
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `--gtest_list_tests` listing
    GtestList,
    /// Stress test progress log
    Stress,
    /// Benchmark summary
    Benchmark,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Parse captured output and print the run result as JSON
    ///
    /// Example:
    ///   adb shell /data/nativetest/foo --gtest_list_tests | nativelog parse --format gtest-list
    Parse {
        /// Grammar of the input
        #[arg(short, long, value_enum)]
        format: OutputFormat,

        /// Run name (defaults to the input file stem)
        #[arg(long, env = "NATIVELOG_RUN_NAME")]
        run_name: Option<String>,

        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Parse stress output and require a minimum iteration count
    VerifyStress {
        /// Iterations the run must have completed
        #[arg(long)]
        expected: u64,

        /// Run name (defaults to the input file stem)
        #[arg(long, env = "NATIVELOG_RUN_NAME")]
        run_name: Option<String>,

        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Parse benchmark output and require an average iteration time
    VerifyBenchmark {
        /// Run name (defaults to the input file stem)
        #[arg(long, env = "NATIVELOG_RUN_NAME")]
        run_name: Option<String>,

        /// Input file (reads stdin when omitted)
        input: Option<PathBuf>,
    },
}

impl Command {
    /// The input file, if one was given
    #[must_use]
    pub fn input(&self) -> Option<&Path> {
        match self {
            Self::Parse { input, .. }
            | Self::VerifyStress { input, .. }
            | Self::VerifyBenchmark { input, .. } => input.as_deref(),
        }
    }

    /// The grammar this command parses
    #[must_use]
    pub fn format(&self) -> OutputFormat {
        match self {
            Self::Parse { format, .. } => *format,
            Self::VerifyStress { .. } => OutputFormat::Stress,
            Self::VerifyBenchmark { .. } => OutputFormat::Benchmark,
        }
    }

    /// Run name: explicit, else the input file stem, else `native`
    #[must_use]
    pub fn run_name(&self) -> String {
        let explicit = match self {
            Self::Parse { run_name, .. }
            | Self::VerifyStress { run_name, .. }
            | Self::VerifyBenchmark { run_name, .. } => run_name.clone(),
        };
        explicit
            .or_else(|| {
                self.input()
                    .and_then(Path::file_stem)
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "native".to_string())
    }
}

impl Config {
    /// Lines per feed call, using the default if not specified
    #[must_use]
    pub fn chunk_lines(&self) -> usize {
        self.chunk_lines.unwrap_or(DEFAULT_CHUNK_LINES)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The chunk size is zero
    /// - The input path is specified but doesn't exist or is a directory
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_lines == Some(0) {
            return Err(ConfigError::ZeroChunkLines);
        }

        if let Some(input) = self.command.as_ref().and_then(Command::input) {
            if !input.exists() {
                return Err(ConfigError::InputNotFound(input.to_path_buf()));
            }
            if input.is_dir() {
                return Err(ConfigError::InputIsDirectory(input.to_path_buf()));
            }
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input file not found
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),

    /// Input path is a directory
    #[error("Input path is a directory: {0}")]
    InputIsDirectory(PathBuf),

    /// Chunk size of zero
    #[error("--chunk-lines must be at least 1")]
    ZeroChunkLines,
}
