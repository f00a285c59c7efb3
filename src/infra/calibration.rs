//! Calibration and test pass
//!
//! The procedure itself lives outside this tool; it is started as a command
//! and judged by its exit status. It inherits the terminal so the operator
//! can follow and answer it.

use std::path::PathBuf;
use std::process::Command;

use crate::config::FactoryConfig;
use crate::core::provision::Calibrator;
use crate::error::CalibrationError;

/// Runs the configured calibration command
#[derive(Debug, Clone)]
pub struct CommandCalibrator {
    command: Vec<String>,
    work_dir: PathBuf,
}

impl CommandCalibrator {
    pub fn new(command: Vec<String>, work_dir: PathBuf) -> Self {
        Self { command, work_dir }
    }

    pub fn from_config(config: &FactoryConfig) -> Self {
        Self::new(config.calibration_command(), config.work_dir())
    }
}

impl Calibrator for CommandCalibrator {
    fn run_calibration(&self) -> Result<(), CalibrationError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or(CalibrationError::EmptyCommand)?;
        let display = self.command.join(" ");

        let status = Command::new(program)
            .args(args)
            .current_dir(&self.work_dir)
            .status()
            .map_err(|e| CalibrationError::Spawn {
                command: display.clone(),
                error: e.to_string(),
            })?;

        if !status.success() {
            return Err(CalibrationError::Failed {
                command: display,
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
