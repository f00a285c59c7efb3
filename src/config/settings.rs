//! Factory configuration file
//!
//! Reads optional settings from `solfactory.toml`. Every setting has a
//! built-in default, so a bench with the standard layout needs no file.
//!
//! Lookup order:
//! 1. `$SOLFACTORY_CONFIG`
//! 2. `./solfactory.toml`
//! 3. `<config dir>/config.toml` (see [`FactoryDirs`])

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::defaults;
use crate::error::ConfigError;
use crate::infra::dirs::FactoryDirs;

/// Factory configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Directory layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Volume labels and waiting behaviour
    #[serde(default)]
    pub volumes: VolumesConfig,

    /// Programmer settings
    #[serde(default)]
    pub flash: FlashConfig,

    /// Calibration procedure
    #[serde(default)]
    pub calibration: CalibrationConfig,

    /// Deployment manifest; replaces the built-in table when non-empty
    #[serde(default)]
    pub deploy: Vec<DeployEntryConfig>,
}

/// Directory layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Repository root holding `firmware/` and `examples/`
    pub project_root: Option<PathBuf>,

    /// Directory holding the images and the J-Link script
    pub work_dir: Option<PathBuf>,

    /// Publish output directory
    pub distribution: Option<PathBuf>,
}

/// Volume labels and waiting behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumesConfig {
    pub bootloader_label: Option<String>,
    pub runtime_label: Option<String>,

    /// Directories whose entries are mounted volumes
    pub mount_roots: Option<Vec<PathBuf>>,

    pub poll_interval_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,

    /// Give up waiting after this long; unset waits until interrupted
    pub wait_timeout_secs: Option<u64>,

    /// Also match labels from the OS disk list (default on Windows)
    pub disk_labels: Option<bool>,
}

/// Programmer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlashConfig {
    pub jlink_path: Option<String>,
    pub device: Option<String>,
    pub interface: Option<String>,
    pub speed: Option<u32>,
    pub commander_script: Option<String>,
    pub bootloader_image: Option<String>,
    pub firmware_image: Option<String>,
}

/// Calibration procedure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Program and arguments
    pub command: Option<Vec<String>>,
}

/// One `[[deploy]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployEntryConfig {
    /// Local path (relative to the project root) or `<zip-url>:<entry>`
    pub source: String,

    /// Root-relative destination, `"."` for the root itself
    pub destination: String,
}

impl FactoryConfig {
    /// Find and load the configuration
    ///
    /// Returns the configuration and the file it came from, if any.
    pub fn discover(dirs: &FactoryDirs) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Ok(explicit) = std::env::var(defaults::ENV_CONFIG_PATH) {
            let path = PathBuf::from(explicit);
            if !path.exists() {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    error: format!("file named by {} does not exist", defaults::ENV_CONFIG_PATH),
                });
            }
            return Ok((Self::load_from_path(&path)?, Some(path)));
        }

        let candidates = [
            PathBuf::from(defaults::CONFIG_FILE_NAME),
            dirs.global_config_path(),
        ];

        for path in candidates {
            if path.exists() {
                tracing::debug!("Using config file {}", path.display());
                return Ok((Self::load_from_path(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Load configuration from a specific path
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn work_dir(&self) -> PathBuf {
        self.paths
            .work_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Repository root; relative values are taken from the working directory
    #[must_use]
    pub fn project_root(&self) -> PathBuf {
        let root = self
            .paths
            .project_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::PROJECT_ROOT));
        self.work_dir().join(root)
    }

    #[must_use]
    pub fn distribution_dir(&self) -> PathBuf {
        let dist = self
            .paths
            .distribution
            .clone()
            .unwrap_or_else(|| PathBuf::from(defaults::DISTRIBUTION_DIR));
        self.work_dir().join(dist)
    }

    #[must_use]
    pub fn bootloader_label(&self) -> &str {
        self.volumes
            .bootloader_label
            .as_deref()
            .unwrap_or(defaults::BOOTLOADER_LABEL)
    }

    #[must_use]
    pub fn runtime_label(&self) -> &str {
        self.volumes
            .runtime_label
            .as_deref()
            .unwrap_or(defaults::RUNTIME_LABEL)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.volumes
                .poll_interval_ms
                .unwrap_or(defaults::VOLUME_POLL_INTERVAL_MS),
        )
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(
            self.volumes
                .settle_delay_ms
                .unwrap_or(defaults::VOLUME_SETTLE_DELAY_MS),
        )
    }

    #[must_use]
    pub fn wait_timeout(&self) -> Option<Duration> {
        self.volumes.wait_timeout_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn disk_labels(&self) -> bool {
        self.volumes.disk_labels.unwrap_or(cfg!(windows))
    }

    #[must_use]
    pub fn bootloader_image(&self) -> PathBuf {
        self.work_dir().join(
            self.flash
                .bootloader_image
                .as_deref()
                .unwrap_or(defaults::BOOTLOADER_IMAGE),
        )
    }

    #[must_use]
    pub fn firmware_image(&self) -> PathBuf {
        self.work_dir().join(
            self.flash
                .firmware_image
                .as_deref()
                .unwrap_or(defaults::FIRMWARE_IMAGE),
        )
    }

    #[must_use]
    pub fn calibration_command(&self) -> Vec<String> {
        self.calibration.command.clone().unwrap_or_else(|| {
            defaults::CALIBRATION_COMMAND
                .iter()
                .map(|s| (*s).to_string())
                .collect()
        })
    }
}
