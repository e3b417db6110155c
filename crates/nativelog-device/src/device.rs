// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The device capability interface
//!
//! Everything the runner needs from a connected device. Transports (adb,
//! ssh, an emulator bridge) implement [`Device`]; parsers never see it.

use thiserror::Error;

/// Errors raised by a device transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// The device is not reachable
    #[error("Device unavailable: {message}")]
    Unavailable {
        /// Transport-specific description
        message: String,
    },

    /// A shell command could not be run to completion
    #[error("Command `{command}` failed: {message}")]
    CommandFailed {
        /// The command line that was sent
        command: String,
        /// Transport-specific description
        message: String,
    },

    /// A shell command exceeded its time limit
    #[error("Command `{command}` timed out after {seconds}s")]
    Timeout {
        /// The command line that was sent
        command: String,
        /// The limit that was exceeded
        seconds: u64,
    },
}

/// Capabilities of a connected device
pub trait Device {
    /// Run a shell command and return its combined output
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the command cannot be delivered or completed.
    fn run_shell_command(&mut self, command: &str) -> Result<String, DeviceError>;

    /// Fetch a file; `Ok(None)` when it does not exist
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the transfer fails.
    fn pull_file(&mut self, path: &str) -> Result<Option<Vec<u8>>, DeviceError>;

    /// Battery charge in percent, if the device reports one
    fn current_battery_level(&self) -> Option<u8>;

    /// Stop background log capture while a binary runs
    fn pause_background_logging(&mut self);

    /// Restart background log capture
    fn resume_background_logging(&mut self);
}

impl<D: Device + ?Sized> Device for &mut D {
    fn run_shell_command(&mut self, command: &str) -> Result<String, DeviceError> {
        (**self).run_shell_command(command)
    }

    fn pull_file(&mut self, path: &str) -> Result<Option<Vec<u8>>, DeviceError> {
        (**self).pull_file(path)
    }

    fn current_battery_level(&self) -> Option<u8> {
        (**self).current_battery_level()
    }

    fn pause_background_logging(&mut self) {
        (**self).pause_background_logging();
    }

    fn resume_background_logging(&mut self) {
        (**self).resume_background_logging();
    }
}
