// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Native benchmark summary parser
//!
//! Benchmark binaries finish with a summary such as
//!
//! ```text
//! Time per iteration min: 0.000251 avg: 0.000272995 max: 0.000487
//! ```
//!
//! Numbers may be integers, decimals, or in scientific notation
//! (`5.9e-05`). Only the average is kept; min and max must be valid numbers
//! for the line to count. The last matching line wins.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, info};

use crate::error::ParseError;
use crate::event::{AVG_ITERATION_TIME_METRIC, Metrics, ResultEvent, ResultSink, emit_all};
use crate::feeder::{OutputParser, elapsed_since};

const NUMBER: &str = r"-?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

static SUMMARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"Time per iteration min:\s*({NUMBER})\s+avg:\s*({NUMBER})\s+max:\s*({NUMBER})(?:\s|$)"
    ))
    .expect("summary pattern is valid")
});

/// Timings from one summary line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationTiming {
    /// Fastest iteration
    pub min: f64,
    /// Mean iteration time
    pub avg: f64,
    /// Slowest iteration
    pub max: f64,
}

/// Extract the timings from a summary line, if it is one
#[must_use]
pub fn parse_summary_line(line: &str) -> Option<IterationTiming> {
    let caps = SUMMARY_RE.captures(line)?;
    let number = |i: usize| -> Option<f64> {
        caps.get(i)?
            .as_str()
            .parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
    };
    Some(IterationTiming {
        min: number(1)?,
        avg: number(2)?,
        max: number(3)?,
    })
}

/// Accumulated state of a benchmark log
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BenchmarkState {
    /// Average from the most recent summary line, 0.0 until one is seen
    pub average: f64,
    /// Number of summary lines seen
    pub matches: usize,
}

impl BenchmarkState {
    /// Consume one line and return the updated state
    #[must_use]
    pub fn advance(mut self, line: &str) -> Self {
        if let Some(timing) = parse_summary_line(line) {
            if self.matches > 0 {
                debug!(
                    previous = self.average,
                    current = timing.avg,
                    "Replacing earlier benchmark average"
                );
            }
            self.average = timing.avg;
            self.matches += 1;
        } else if line.contains("Time per iteration") {
            debug!(line, "Skipping malformed benchmark summary");
        }
        self
    }

    /// Turn the final state into the run's event sequence
    #[must_use]
    pub fn into_events(self, run_name: &str, elapsed_ms: u64) -> Vec<ResultEvent> {
        let mut metrics = Metrics::new();
        metrics.insert(AVG_ITERATION_TIME_METRIC.to_string(), self.average.into());
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

/// Parser for native benchmark output
#[derive(Debug, Clone)]
pub struct NativeBenchmarkParser {
    run_name: String,
    started_at: DateTime<Utc>,
    state: BenchmarkState,
}

impl NativeBenchmarkParser {
    /// Create a parser reporting under `run_name`
    #[must_use]
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            started_at: Utc::now(),
            state: BenchmarkState::default(),
        }
    }

    /// Average iteration time from the last summary line, or 0.0
    #[must_use]
    pub fn average_time(&self) -> f64 {
        self.state.average
    }

    /// Whether any summary line has been seen
    #[must_use]
    pub fn has_summary(&self) -> bool {
        self.state.matches > 0
    }
}

impl OutputParser for NativeBenchmarkParser {
    fn process_line(&mut self, line: &str) {
        self.state = self.state.advance(line);
    }

    fn finalize<S>(self, sink: &mut S) -> Result<(), ParseError>
    where
        S: ResultSink + ?Sized,
    {
        let elapsed_ms = elapsed_since(self.started_at);
        info!(
            run = %self.run_name,
            average = self.state.average,
            summaries = self.state.matches,
            "Parsed benchmark output"
        );
        emit_all(sink, self.state.into_events(&self.run_name, elapsed_ms))?;
        Ok(())
    }
}
