// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Aggregated run result types

use serde::{Deserialize, Serialize};

use crate::error::MissingMetric;
use crate::event::{MetricValue, Metrics, TestIdentity};

/// Possible test outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    /// Test passed
    Passed,
    /// Test failed
    Failed,
}

/// Represents a single finished test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test identity
    pub test: TestIdentity,
    /// Test outcome
    pub outcome: TestOutcome,
    /// Per-test metrics
    pub metrics: Metrics,
    /// Failure message, when the test failed
    pub failure: Option<String>,
}

impl TestResult {
    /// Check if the test passed
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outcome == TestOutcome::Passed
    }

    /// Check if the test failed
    #[must_use]
    pub fn failed(&self) -> bool {
        self.outcome == TestOutcome::Failed
    }
}

/// Everything reported for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Run name
    pub name: String,
    /// Test count announced when the run started
    pub expected_count: usize,
    /// Finished tests in report order
    pub tests: Vec<TestResult>,
    /// Run-level metrics
    pub metrics: Metrics,
    /// Elapsed wall time in milliseconds
    pub elapsed_ms: u64,
    /// Set when the run as a whole was marked failed
    pub failure: Option<String>,
}

impl RunResult {
    /// Create an empty result for a freshly started run
    #[must_use]
    pub fn new(name: impl Into<String>, expected_count: usize) -> Self {
        Self {
            name: name.into(),
            expected_count,
            tests: Vec::new(),
            metrics: Metrics::new(),
            elapsed_ms: 0,
            failure: None,
        }
    }

    /// A run is failed when it was marked failed or any test failed
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some() || self.tests.iter().any(TestResult::failed)
    }

    /// Identities of every reported test, in report order
    #[must_use]
    pub fn identities(&self) -> Vec<&TestIdentity> {
        self.tests.iter().map(|t| &t.test).collect()
    }

    /// Get failing tests
    #[must_use]
    pub fn failing_tests(&self) -> Vec<&TestResult> {
        self.tests.iter().filter(|t| t.failed()).collect()
    }

    /// Look up a run metric that the caller cannot do without
    ///
    /// # Errors
    ///
    /// Returns `MissingMetric` if the run did not report `key`.
    pub fn require_metric(&self, key: &str) -> Result<&MetricValue, MissingMetric> {
        self.metrics.get(key).ok_or_else(|| MissingMetric {
            run: self.name.clone(),
            key: key.to_string(),
        })
    }
}
