// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Run lifecycle events and the sink they are delivered to
//!
//! Every parser reports its findings as an ordered sequence of
//! [`ResultEvent`]s. A run always opens with [`ResultEvent::RunStarted`] and
//! closes with [`ResultEvent::RunEnded`]; each test in between is a
//! `TestStarted` / optional `TestFailed` / `TestEnded` triple.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// Run metric key written by the stress parser
pub const ITERATIONS_METRIC: &str = "iterations";

/// Run metric key written by the benchmark parser
pub const AVG_ITERATION_TIME_METRIC: &str = "avg-iteration-time";

/// A discovered test: suite name plus method name, both kept verbatim
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TestIdentity {
    /// Suite (test case) name, without the trailing '.'
    pub suite: String,
    /// Method name; may contain '/' for parameterized tests
    pub method: String,
}

impl TestIdentity {
    /// Create a new identity
    #[must_use]
    pub fn new(suite: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            method: method.into(),
        }
    }

    /// The `Suite.Method` form accepted by `--gtest_filter`
    #[must_use]
    pub fn gtest_filter(&self) -> String {
        format!("{}.{}", self.suite, self.method)
    }
}

impl fmt::Display for TestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.suite, self.method)
    }
}

/// A single metric value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Whole number (counters)
    Integer(u64),
    /// Floating point measurement
    Float(f64),
    /// Free-form text
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value, if it has one
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(x) => Some(*x),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view of the value, if it has one
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Metric set attached to a test or a run; keys are unique
pub type Metrics = BTreeMap<String, MetricValue>;

/// One step of the run lifecycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ResultEvent {
    /// Run opened; `test_count` is 0 when the count is not known up front
    RunStarted {
        /// Run name
        name: String,
        /// Expected number of tests
        test_count: usize,
    },
    /// A test began
    TestStarted {
        /// The test
        test: TestIdentity,
    },
    /// The currently open test failed
    TestFailed {
        /// The test
        test: TestIdentity,
        /// Failure description
        message: String,
    },
    /// The currently open test finished
    TestEnded {
        /// The test
        test: TestIdentity,
        /// Per-test metrics
        metrics: Metrics,
    },
    /// The whole run is failed, independent of per-test outcomes
    RunFailed {
        /// Failure description
        message: String,
    },
    /// Run closed
    RunEnded {
        /// Elapsed wall time in milliseconds
        elapsed_ms: u64,
        /// Run-level metrics
        metrics: Metrics,
    },
}

impl ResultEvent {
    /// Short name of the event kind, used in diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::TestStarted { .. } => "test_started",
            Self::TestFailed { .. } => "test_failed",
            Self::TestEnded { .. } => "test_ended",
            Self::RunFailed { .. } => "run_failed",
            Self::RunEnded { .. } => "run_ended",
        }
    }
}

/// Receiver of run lifecycle events
///
/// Events are delivered synchronously and in order on the thread that calls
/// the parser's terminal method. A sink that blocks stalls that thread.
pub trait ResultSink {
    /// Handle the next event
    ///
    /// # Errors
    ///
    /// Returns a `SinkError` if the event cannot be accepted.
    fn handle(&mut self, event: ResultEvent) -> Result<(), SinkError>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn handle(&mut self, event: ResultEvent) -> Result<(), SinkError> {
        (**self).handle(event)
    }
}

/// Records every event; the usual test double
impl ResultSink for Vec<ResultEvent> {
    fn handle(&mut self, event: ResultEvent) -> Result<(), SinkError> {
        self.push(event);
        Ok(())
    }
}

/// Forwards events to another thread, preserving order
impl ResultSink for Sender<ResultEvent> {
    fn handle(&mut self, event: ResultEvent) -> Result<(), SinkError> {
        self.send(event).map_err(|_| SinkError::Disconnected)
    }
}

/// Deliver a finished event sequence, stopping at the first rejection
///
/// # Errors
///
/// Returns the first `SinkError` raised by `sink`.
pub fn emit_all<S, I>(sink: &mut S, events: I) -> Result<(), SinkError>
where
    S: ResultSink + ?Sized,
    I: IntoIterator<Item = ResultEvent>,
{
    for event in events {
        sink.handle(event)?;
    }
    Ok(())
}
