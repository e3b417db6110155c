//! nativelog library
//!
//! This module exports the command-line configuration and subcommands for
//! use in integration tests and as a library.

pub mod commands;
pub mod config;
