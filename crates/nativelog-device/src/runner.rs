// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Running native binaries on a device
//!
//! [`NativeTestRunner`] issues the shell command for a binary, feeds the
//! captured output to the matching parser and finalizes it into a sink.
//! Device failures are reported to the sink as a failed run before the error
//! is returned to the caller.
//!
//! # Example
//!
//! ```no_run
//! use nativelog_device::{Device, NativeTestRunner, RunnerOptions};
//! use nativelog_parsers::RunCollector;
//!
//! fn stress<D: Device>(device: D) {
//!     let mut runner = NativeTestRunner::new(device, RunnerOptions::default());
//!     let mut collector = RunCollector::new();
//!     runner
//!         .run_stress("/data/local/tmp/stress", 100, &mut collector)
//!         .expect("stress run");
//! }
//! ```

use nativelog_parsers::{
    GTestListParser, Metrics, NativeBenchmarkParser, NativeStressParser, OutputParser,
    ResultEvent, ResultSink, RunCollector, TestIdentity, line_chunks,
};
use tracing::{debug, info, warn};

use crate::device::Device;
use crate::error::RunError;

/// Flag that makes a gtest binary print its test listing
pub const GTEST_LIST_FLAG: &str = "--gtest_list_tests";

/// Knobs for [`NativeTestRunner`]
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Refuse to run when the device reports less charge than this
    pub min_battery_level: Option<u8>,
    /// Lines handed to the parser per `feed` call
    pub lines_per_chunk: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            min_battery_level: None,
            lines_per_chunk: 500,
        }
    }
}

impl RunnerOptions {
    /// Require at least `level` percent battery
    #[must_use]
    pub fn with_min_battery(mut self, level: u8) -> Self {
        self.min_battery_level = Some(level);
        self
    }

    /// Set the feed chunk size
    #[must_use]
    pub fn with_chunk_lines(mut self, lines: usize) -> Self {
        self.lines_per_chunk = lines.max(1);
        self
    }
}

/// Drives native binaries on one device
pub struct NativeTestRunner<D> {
    device: D,
    options: RunnerOptions,
}

impl<D: Device> NativeTestRunner<D> {
    /// Create a runner for `device`
    #[must_use]
    pub fn new(device: D, options: RunnerOptions) -> Self {
        Self { device, options }
    }

    /// Access the underlying device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give the device back
    #[must_use]
    pub fn into_device(self) -> D {
        self.device
    }

    /// Discover the tests in a gtest binary
    ///
    /// # Errors
    ///
    /// Returns `RunError::Device` if the listing cannot be obtained and
    /// `RunError::Parse` if it is malformed.
    pub fn list_tests(&mut self, binary: &str) -> Result<Vec<TestIdentity>, RunError> {
        let mut collector = RunCollector::new();
        self.execute(
            &format!("{binary} {GTEST_LIST_FLAG}"),
            GTestListParser::new(run_name(binary)),
            &mut collector,
        )?;

        let tests = collector
            .finish()
            .map_err(nativelog_parsers::SinkError::from)?
            .into_iter()
            .flat_map(|run| run.tests)
            .map(|t| t.test)
            .collect();
        Ok(tests)
    }

    /// Run the listing of a gtest binary into `sink`
    ///
    /// # Errors
    ///
    /// See [`NativeTestRunner::list_tests`].
    pub fn report_listing<S>(&mut self, binary: &str, sink: &mut S) -> Result<(), RunError>
    where
        S: ResultSink + ?Sized,
    {
        self.execute(
            &format!("{binary} {GTEST_LIST_FLAG}"),
            GTestListParser::new(run_name(binary)),
            sink,
        )
    }

    /// Run a stress binary for `iterations` passes
    ///
    /// # Errors
    ///
    /// Returns `RunError::Device` or `RunError::LowBattery` after reporting
    /// the run as failed to `sink`.
    pub fn run_stress<S>(&mut self, binary: &str, iterations: u64, sink: &mut S) -> Result<(), RunError>
    where
        S: ResultSink + ?Sized,
    {
        self.execute(
            &format!("{binary} {iterations}"),
            NativeStressParser::new(run_name(binary)),
            sink,
        )
    }

    /// Run a benchmark binary
    ///
    /// # Errors
    ///
    /// Returns `RunError::Device` or `RunError::LowBattery` after reporting
    /// the run as failed to `sink`.
    pub fn run_benchmark<S>(&mut self, binary: &str, sink: &mut S) -> Result<(), RunError>
    where
        S: ResultSink + ?Sized,
    {
        self.execute(binary, NativeBenchmarkParser::new(run_name(binary)), sink)
    }

    /// Pull a file the binary left on the device
    ///
    /// # Errors
    ///
    /// Returns `RunError::MissingArtifact` if the file does not exist.
    pub fn pull_artifact(&mut self, path: &str) -> Result<Vec<u8>, RunError> {
        self.device
            .pull_file(path)?
            .ok_or_else(|| RunError::MissingArtifact {
                path: path.to_string(),
            })
    }

    fn execute<P, S>(&mut self, command: &str, mut parser: P, sink: &mut S) -> Result<(), RunError>
    where
        P: OutputParser,
        S: ResultSink + ?Sized,
    {
        let name = run_name(command.split_whitespace().next().unwrap_or(command)).to_string();

        if let Err(err) = self.check_battery() {
            report_failure(sink, &name, &err.to_string())?;
            return Err(err);
        }

        debug!(%command, "Running native binary");
        self.device.pause_background_logging();
        let output = self.device.run_shell_command(command);
        self.device.resume_background_logging();

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                warn!(%command, error = %err, "Device command failed");
                report_failure(sink, &name, &err.to_string())?;
                return Err(err.into());
            }
        };

        for lines in line_chunks(&output, self.options.lines_per_chunk) {
            parser.feed(lines);
        }
        parser.finalize(sink)?;
        info!(run = %name, "Native binary finished");
        Ok(())
    }

    fn check_battery(&self) -> Result<(), RunError> {
        let Some(minimum) = self.options.min_battery_level else {
            return Ok(());
        };
        match self.device.current_battery_level() {
            Some(level) if level < minimum => Err(RunError::LowBattery { level, minimum }),
            _ => Ok(()),
        }
    }
}

/// Report a run that never produced output as failed
fn report_failure<S>(sink: &mut S, name: &str, message: &str) -> Result<(), RunError>
where
    S: ResultSink + ?Sized,
{
    nativelog_parsers::event::emit_all(
        sink,
        [
            ResultEvent::RunStarted {
                name: name.to_string(),
                test_count: 0,
            },
            ResultEvent::RunFailed {
                message: message.to_string(),
            },
            ResultEvent::RunEnded {
                elapsed_ms: 0,
                metrics: Metrics::new(),
            },
        ],
    )?;
    Ok(())
}

/// The file name of a binary path, used as the run name
#[must_use]
pub fn run_name(binary: &str) -> &str {
    binary.rsplit('/').next().unwrap_or(binary)
}
