// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! nativelog-device: Running native test binaries on a device
//!
//! This library crate connects the parsers in `nativelog-parsers` to a
//! device through the [`Device`] capability trait, and verifies the metrics
//! of finished runs.

#![warn(missing_docs)]

pub mod device;
pub mod error;
pub mod runner;
pub mod verify;

pub use device::{Device, DeviceError};
pub use error::RunError;
pub use runner::{NativeTestRunner, RunnerOptions};
pub use verify::{benchmark_average, verify_stress_iterations};
