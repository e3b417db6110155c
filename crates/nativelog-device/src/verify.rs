// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Checks applied to finished runs
//!
//! A run that lacks the metric a check depends on is an error, never a pass.

use nativelog_parsers::{AVG_ITERATION_TIME_METRIC, ITERATIONS_METRIC, RunResult};
use tracing::info;

use crate::error::RunError;

fn ensure_not_failed(result: &RunResult) -> Result<(), RunError> {
    match &result.failure {
        Some(message) => Err(RunError::RunFailed {
            run: result.name.clone(),
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

/// Check that a stress run completed at least `expected` iterations
///
/// Returns the completed count.
///
/// # Errors
///
/// Returns `RunError::RunFailed` for a failed run, `RunError::MissingMetric`
/// when no iteration count was reported, and `RunError::IterationShortfall`
/// when too few iterations completed.
pub fn verify_stress_iterations(result: &RunResult, expected: u64) -> Result<u64, RunError> {
    ensure_not_failed(result)?;
    let value = result.require_metric(ITERATIONS_METRIC)?;
    let completed = value.as_u64().ok_or_else(|| RunError::InvalidMetric {
        key: ITERATIONS_METRIC.to_string(),
        value: value.clone(),
    })?;

    if completed < expected {
        return Err(RunError::IterationShortfall {
            expected,
            completed,
        });
    }
    info!(run = %result.name, completed, expected, "Stress run verified");
    Ok(completed)
}

/// Extract the average iteration time of a benchmark run
///
/// # Errors
///
/// Returns `RunError::RunFailed` for a failed run, `RunError::MissingMetric`
/// when no average was reported, and `RunError::InvalidMetric` when it is
/// not a number.
pub fn benchmark_average(result: &RunResult) -> Result<f64, RunError> {
    ensure_not_failed(result)?;
    let value = result.require_metric(AVG_ITERATION_TIME_METRIC)?;
    value.as_f64().ok_or_else(|| RunError::InvalidMetric {
        key: AVG_ITERATION_TIME_METRIC.to_string(),
        value: value.clone(),
    })
}
