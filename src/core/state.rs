//! Device state and the provisioning plan derived from it
//!
//! [`ProvisioningState`] is a snapshot of which volumes are mounted and which
//! marker files the runtime volume carries. [`ProvisioningPlan::from_state`]
//! maps every combination to the actions a run performs.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::VolumeError;

/// Whether a labelled volume is mounted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeState {
    Present(PathBuf),
    Absent,
}

impl VolumeState {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Present(path) => Some(path),
            Self::Absent => None,
        }
    }
}

/// Finds mounted volumes by label
#[allow(async_fn_in_trait)]
pub trait VolumeLocator {
    /// Non-blocking lookup; a missing volume is [`VolumeState::Absent`]
    fn find_by_label(&self, label: &str) -> VolumeState;

    /// Wait until the volume is mounted and return its path
    async fn wait_for_label(&self, label: &str) -> Result<PathBuf, VolumeError>;
}

/// Volume labels and marker files a run inspects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceLabels {
    pub bootloader: String,
    pub runtime: String,
}

impl Default for DeviceLabels {
    fn default() -> Self {
        Self {
            bootloader: defaults::BOOTLOADER_LABEL.to_string(),
            runtime: defaults::RUNTIME_LABEL.to_string(),
        }
    }
}

/// Snapshot of the device as seen from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningState {
    pub bootloader: VolumeState,
    pub runtime: VolumeState,
    /// `code.py` exists on the runtime volume
    pub has_code: bool,
    /// `calibration.py` exists on the runtime volume
    pub has_calibration: bool,
}

impl ProvisioningState {
    /// Query both volumes and the runtime markers
    pub fn detect(locator: &impl VolumeLocator, labels: &DeviceLabels) -> Self {
        let bootloader = locator.find_by_label(&labels.bootloader);
        let runtime = locator.find_by_label(&labels.runtime);
        let marker = |name: &str| runtime.path().is_some_and(|p| p.join(name).exists());

        let state = Self {
            has_code: marker(defaults::CODE_MARKER),
            has_calibration: marker(defaults::CALIBRATION_MARKER),
            bootloader,
            runtime,
        };
        tracing::debug!(?state, "Detected device state");
        state
    }
}

/// How code deployment is gated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployDecision {
    /// Deploy without asking
    Unconditional,
    /// Code is already on the device; ask before overwriting
    Confirm,
}

/// Actions for one device-mode run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisioningPlan {
    pub flash_bootloader: bool,
    pub flash_firmware: bool,
    pub deploy: DeployDecision,
    pub calibrate: bool,
}

impl ProvisioningPlan {
    /// | bootloader | runtime                | plan                                   |
    /// |------------|------------------------|----------------------------------------|
    /// | absent     | absent                 | bootloader, firmware, deploy, calibrate |
    /// | present    | absent                 | firmware, deploy, calibrate            |
    /// | any        | present, no `code.py`  | deploy, calibrate unless calibrated    |
    /// | any        | present, `code.py`     | confirm deploy, calibrate unless calibrated |
    pub fn from_state(state: &ProvisioningState) -> Self {
        match (&state.bootloader, &state.runtime) {
            (VolumeState::Absent, VolumeState::Absent) => Self {
                flash_bootloader: true,
                flash_firmware: true,
                deploy: DeployDecision::Unconditional,
                calibrate: true,
            },
            (VolumeState::Present(_), VolumeState::Absent) => Self {
                flash_bootloader: false,
                flash_firmware: true,
                deploy: DeployDecision::Unconditional,
                calibrate: true,
            },
            (bootloader, VolumeState::Present(_)) => {
                if bootloader.is_present() {
                    tracing::warn!(
                        "Both bootloader and runtime volumes are mounted, using runtime"
                    );
                }
                Self {
                    flash_bootloader: false,
                    flash_firmware: false,
                    deploy: if state.has_code {
                        DeployDecision::Confirm
                    } else {
                        DeployDecision::Unconditional
                    },
                    calibrate: !state.has_calibration,
                }
            }
        }
    }
}
