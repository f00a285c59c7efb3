//! Infrastructure layer
//!
//! Handles all I/O operations: network, filesystem, volumes and external
//! processes. This module is the only place where side effects occur.

pub mod calibration;
pub mod dirs;
pub mod download;
pub mod filesystem;
pub mod flasher;
pub mod prompt;
pub mod signal;
pub mod volume;
