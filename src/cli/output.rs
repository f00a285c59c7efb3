//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress spinners,
//! status lines, and errors to the operator.

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::provision::{Action, ProvisioningReport};
use crate::core::resolver::ResolveReport;

/// Create a spinner for operations with unknown duration
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}

/// Print an error and its causes to stderr
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

/// Print a resolver summary
pub fn print_resolve_report(report: &ResolveReport) {
    for entry in &report.entries {
        println!("  {} -> {}", entry.source, entry.destination.display());
    }
}

/// Print what a device-mode run did
pub fn print_provisioning_report(report: &ProvisioningReport) {
    for action in &report.actions {
        match action {
            Action::FlashBootloader => println!("{} Bootloader programmed", status::SUCCESS),
            Action::FlashFirmware { target } => println!(
                "{} Firmware written to {}",
                status::SUCCESS,
                target.display()
            ),
            Action::DeployCode { target, entries } => println!(
                "{} Deployed {entries} entries to {}",
                status::SUCCESS,
                target.display()
            ),
            Action::DeployDeclined => println!("{} Code deployment skipped", status::INFO),
            Action::Calibrate => println!("{} Calibration finished", status::SUCCESS),
        }
    }

    if !report.plan.calibrate {
        println!("{} Device already calibrated", status::INFO);
    }
}
