//! CLI command implementations
//!
//! Each mode is implemented in its own submodule.

pub mod provision;
pub mod publish;

use anyhow::{Context, Result};

use crate::config::FactoryConfig;
use crate::core::manifest::DeploymentManifest;
use crate::infra::dirs::FactoryDirs;

/// Load the factory configuration, falling back to defaults
pub fn load_config() -> Result<FactoryConfig> {
    let (config, source) =
        FactoryConfig::discover(&FactoryDirs::new()).context("Failed to load configuration")?;

    match source {
        Some(path) => tracing::info!("Using configuration from {}", path.display()),
        None => tracing::debug!("No configuration file, using defaults"),
    }

    Ok(config)
}

/// The configured deployment manifest, or the built-in one
pub fn load_manifest(config: &FactoryConfig) -> Result<DeploymentManifest> {
    let project_root = config.project_root();

    let manifest = if config.deploy.is_empty() {
        DeploymentManifest::factory_default(&project_root)
    } else {
        DeploymentManifest::from_entries(&project_root, &config.deploy)
    };

    manifest.context("Invalid deployment manifest")
}
