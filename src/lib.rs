//! Solfactory - factory provisioning for the Sol synthesizer module
//!
//! Flashes the bootloader and CircuitPython firmware, deploys the
//! application code and its libraries, and starts the calibration pass.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Provisioning decisions and manifest resolution
//! - [`infra`] - Infrastructure layer (network, filesystem, volumes, processes)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
