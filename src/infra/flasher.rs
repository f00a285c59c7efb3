//! Device programming
//!
//! The bootloader goes on over SWD with SEGGER's J-Link commander. The
//! firmware goes on by copying a UF2 image onto the bootloader's volume,
//! after which the device reboots into the runtime.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::{defaults, FactoryConfig};
use crate::core::provision::Flasher;
use crate::error::FlashError;
use crate::infra::filesystem;

/// J-Link and UF2 settings
#[derive(Debug, Clone)]
pub struct JLinkFlasher {
    /// J-Link commander executable
    pub tool: String,
    pub device: String,
    pub interface: String,
    pub speed_khz: u32,
    pub commander_script: String,
    /// Directory the tool runs in, holding the script and images
    pub work_dir: PathBuf,
    pub bootloader_image: PathBuf,
    pub firmware_image: PathBuf,
}

impl JLinkFlasher {
    pub fn from_config(config: &FactoryConfig) -> Self {
        let flash = &config.flash;
        Self {
            tool: flash
                .jlink_path
                .clone()
                .unwrap_or_else(|| defaults::jlink_path().to_string()),
            device: flash
                .device
                .clone()
                .unwrap_or_else(|| defaults::JLINK_DEVICE.to_string()),
            interface: flash
                .interface
                .clone()
                .unwrap_or_else(|| defaults::JLINK_INTERFACE.to_string()),
            speed_khz: flash.speed.unwrap_or(defaults::JLINK_SPEED_KHZ),
            commander_script: flash
                .commander_script
                .clone()
                .unwrap_or_else(|| defaults::JLINK_COMMANDER_SCRIPT.to_string()),
            work_dir: config.work_dir(),
            bootloader_image: config.bootloader_image(),
            firmware_image: config.firmware_image(),
        }
    }

    /// Arguments passed to the J-Link commander
    pub fn jlink_args(&self) -> Vec<String> {
        vec![
            "-device".to_string(),
            self.device.clone(),
            "-autoconnect".to_string(),
            "1".to_string(),
            "-if".to_string(),
            self.interface.clone(),
            "-speed".to_string(),
            self.speed_khz.to_string(),
            "-CommanderScript".to_string(),
            self.commander_script.clone(),
        ]
    }
}

impl Flasher for JLinkFlasher {
    fn required_artifacts(&self) -> Vec<PathBuf> {
        vec![self.bootloader_image.clone(), self.firmware_image.clone()]
    }

    fn flash_bootloader(&self) -> Result<(), FlashError> {
        // Absolute paths are checked as-is, bare names through PATH
        let found = if Path::new(&self.tool).is_absolute() {
            Path::new(&self.tool).exists()
        } else {
            which::which(&self.tool).is_ok()
        };
        if !found {
            return Err(FlashError::ToolNotFound {
                tool: self.tool.clone(),
            });
        }

        tracing::debug!("Running {} {}", self.tool, self.jlink_args().join(" "));
        let output = Command::new(&self.tool)
            .args(self.jlink_args())
            .current_dir(&self.work_dir)
            .output()
            .map_err(|e| FlashError::Spawn {
                tool: self.tool.clone(),
                error: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FlashError::ToolFailed {
                tool: self.tool.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!("{}", String::from_utf8_lossy(&output.stdout));
        Ok(())
    }

    fn flash_firmware(&self, target: &Path) -> Result<(), FlashError> {
        let destination = target.join(defaults::FIRMWARE_TARGET_NAME);
        filesystem::copy_file_synced(&self.firmware_image, &destination)?;
        Ok(())
    }
}
