// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Native stress test progress parser
//!
//! Stress binaries print a progress line after every iteration:
//!
//! ```text
//! ==== Completed pass: 0
//! ==== Completed pass: 1
//! ==== Completed pass: 2 failed
//! ```
//!
//! Whitespace is irrelevant. Lines with a trailing `failed` are failed
//! attempts and do not count; everything unrecognised is skipped.

use chrono::{DateTime, Utc};
use tracing::{debug, info, trace};

use crate::error::ParseError;
use crate::event::{ITERATIONS_METRIC, Metrics, ResultEvent, ResultSink, emit_all};
use crate::feeder::{OutputParser, elapsed_since};

const PASS_PREFIX: &str = "====Completedpass:";
const FAILURE_QUALIFIER: &str = "failed";

/// How a single line was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassLine {
    /// A completed iteration with its index
    Completed(u64),
    /// A pass line carrying the failure qualifier
    Failed,
    /// A pass line whose index is not a valid integer
    BadIndex,
    /// Not a pass line at all
    Other,
}

/// Classify one line of stress output
#[must_use]
pub fn classify_line(line: &str) -> PassLine {
    let normalized: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    let Some(rest) = normalized.strip_prefix(PASS_PREFIX) else {
        return PassLine::Other;
    };
    if rest.ends_with(FAILURE_QUALIFIER) {
        return PassLine::Failed;
    }
    match rest.parse::<u64>() {
        Ok(index) => PassLine::Completed(index),
        Err(_) => PassLine::BadIndex,
    }
}

/// Running counters of a stress log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StressTally {
    /// Iterations that completed successfully
    pub completed: u64,
    /// Pass attempts reported as failed
    pub failed: u64,
    /// Index of the most recent completed pass
    pub last_index: Option<u64>,
}

impl StressTally {
    /// Consume one line and return the updated tally
    #[must_use]
    pub fn advance(mut self, line: &str) -> Self {
        match classify_line(line) {
            PassLine::Completed(index) => {
                trace!(index, "Completed pass");
                self.completed += 1;
                self.last_index = Some(index);
            }
            PassLine::Failed => {
                debug!(line, "Failed pass attempt");
                self.failed += 1;
            }
            PassLine::BadIndex => debug!(line, "Skipping pass line with invalid index"),
            PassLine::Other => {}
        }
        self
    }

    /// Turn the final tally into the run's event sequence
    #[must_use]
    pub fn into_events(self, run_name: &str, elapsed_ms: u64) -> Vec<ResultEvent> {
        let mut metrics = Metrics::new();
        metrics.insert(ITERATIONS_METRIC.to_string(), self.completed.into());
        vec![
            ResultEvent::RunStarted {
                name: run_name.to_string(),
                test_count: 0,
            },
            ResultEvent::RunEnded {
                elapsed_ms,
                metrics,
            },
        ]
    }
}

/// Parser for native stress test output
#[derive(Debug, Clone)]
pub struct NativeStressParser {
    run_name: String,
    started_at: DateTime<Utc>,
    tally: StressTally,
}

impl NativeStressParser {
    /// Create a parser reporting under `run_name`
    #[must_use]
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            started_at: Utc::now(),
            tally: StressTally::default(),
        }
    }

    /// Iterations completed so far
    #[must_use]
    pub fn completed_count(&self) -> u64 {
        self.tally.completed
    }

    /// Failed pass attempts seen so far
    #[must_use]
    pub fn failed_count(&self) -> u64 {
        self.tally.failed
    }

    /// Current counters
    #[must_use]
    pub fn tally(&self) -> StressTally {
        self.tally
    }
}

impl OutputParser for NativeStressParser {
    fn process_line(&mut self, line: &str) {
        self.tally = self.tally.advance(line);
    }

    fn finalize<S>(self, sink: &mut S) -> Result<(), ParseError>
    where
        S: ResultSink + ?Sized,
    {
        let elapsed_ms = elapsed_since(self.started_at);
        info!(
            run = %self.run_name,
            iterations = self.tally.completed,
            failed = self.tally.failed,
            "Parsed stress output"
        );
        emit_all(sink, self.tally.into_events(&self.run_name, elapsed_ms))?;
        Ok(())
    }
}
