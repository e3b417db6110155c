// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for nativelog-device

use nativelog_parsers::{MetricValue, MissingMetric, ParseError, SinkError};
use thiserror::Error;

use crate::device::DeviceError;

/// Errors that can occur while running or verifying a native binary
#[derive(Debug, Error)]
pub enum RunError {
    /// The device failed; the run was reported as failed first
    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    /// The binary's output could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The sink rejected an event
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// The battery is below the configured minimum
    #[error("Battery level {level}% is below the required {minimum}%")]
    LowBattery {
        /// Reported charge
        level: u8,
        /// Configured minimum
        minimum: u8,
    },

    /// A file expected on the device was not there
    #[error("File not found on device: {path}")]
    MissingArtifact {
        /// Remote path
        path: String,
    },

    /// A required metric was not reported
    #[error(transparent)]
    MissingMetric(#[from] MissingMetric),

    /// A metric was reported with an unusable value
    #[error("Metric {key:?} has unusable value {value}")]
    InvalidMetric {
        /// Metric key
        key: String,
        /// The reported value
        value: MetricValue,
    },

    /// The run was marked failed
    #[error("Run {run} failed: {message}")]
    RunFailed {
        /// Run name
        run: String,
        /// Failure description
        message: String,
    },

    /// A stress run completed fewer iterations than requested
    #[error("Stress run completed {completed} of {expected} iterations")]
    IterationShortfall {
        /// Requested iterations
        expected: u64,
        /// Completed iterations
        completed: u64,
    },
}
