//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::{Parser, ValueEnum};

/// Solfactory - provision Sol modules on the factory bench
///
/// Without arguments, flashes and deploys the attached device as needed.
/// With `publish`, writes the distribution bundle instead.
#[derive(Parser, Debug)]
#[command(name = "solfactory")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run mode; omit to provision the attached device
    #[arg(value_enum)]
    pub mode: Option<Mode>,
}

/// Alternate run modes
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Write the local deployment files to the distribution directory
    Publish,
}

impl Cli {
    /// Execute the selected mode
    pub async fn run(self) -> Result<()> {
        let config = commands::load_config()?;

        match self.mode {
            Some(Mode::Publish) => commands::publish::execute(&config).await,
            None => commands::provision::execute(&config).await,
        }
    }
}
