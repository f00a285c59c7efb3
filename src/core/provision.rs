//! Device-mode provisioning
//!
//! One run inspects the device, derives a [`ProvisioningPlan`] and carries it
//! out in dependency order: bootloader, firmware, code, calibration. Every
//! action looks its volume up again instead of reusing an earlier path, since
//! flashing reboots the device and remounts its volumes.
//!
//! An interrupt is honoured before every action and after the redeploy
//! prompt, so nothing new is started once the operator pressed Ctrl-C.

use std::path::{Path, PathBuf};

use crate::core::manifest::DeploymentManifest;
use crate::core::resolver::{ArchiveFetcher, ManifestResolver, ResolveReport};
use crate::core::state::{
    DeployDecision, DeviceLabels, ProvisioningPlan, ProvisioningState, VolumeLocator,
};
use crate::error::{CalibrationError, FactoryError, FlashError};
use crate::infra::signal::CancelFlag;

/// Programs the device
pub trait Flasher {
    /// Local files that must exist before touching hardware
    fn required_artifacts(&self) -> Vec<PathBuf>;

    fn flash_bootloader(&self) -> Result<(), FlashError>;

    /// Write the firmware image to the mounted bootloader volume
    fn flash_firmware(&self, target: &Path) -> Result<(), FlashError>;
}

/// Runs the calibration and test pass
pub trait Calibrator {
    fn run_calibration(&self) -> Result<(), CalibrationError>;
}

/// Asks the operator a yes/no question
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

/// Something a run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    FlashBootloader,
    FlashFirmware { target: PathBuf },
    DeployCode { target: PathBuf, entries: usize },
    DeployDeclined,
    Calibrate,
}

/// Outcome of a device-mode run
#[derive(Debug)]
pub struct ProvisioningReport {
    pub state: ProvisioningState,
    pub plan: ProvisioningPlan,
    pub actions: Vec<Action>,
    pub deployment: Option<ResolveReport>,
}

/// Device-mode orchestrator with injected collaborators
pub struct Provisioner<L, F, C, P, A> {
    pub locator: L,
    pub flasher: F,
    pub calibrator: C,
    pub confirm: P,
    pub resolver: ManifestResolver<A>,
    pub labels: DeviceLabels,
    pub cancel: CancelFlag,
}

impl<L, F, C, P, A> Provisioner<L, F, C, P, A>
where
    L: VolumeLocator,
    F: Flasher,
    C: Calibrator,
    P: Confirm,
    A: ArchiveFetcher,
{
    /// Provision the attached device, deploying `manifest` as its code
    pub async fn run(
        &self,
        manifest: &DeploymentManifest,
    ) -> Result<ProvisioningReport, FactoryError> {
        self.check_artifacts()?;

        let state = ProvisioningState::detect(&self.locator, &self.labels);
        let plan = ProvisioningPlan::from_state(&state);
        tracing::debug!(?plan, "Provisioning plan");

        let mut actions = Vec::new();
        let mut deployment = None;

        if plan.flash_bootloader {
            self.check_cancelled()?;
            tracing::info!("========== PROGRAMMING BOOTLOADER ==========");
            self.flasher.flash_bootloader()?;
            actions.push(Action::FlashBootloader);
        }

        if plan.flash_firmware {
            self.check_cancelled()?;
            tracing::info!("========== PROGRAMMING CIRCUITPYTHON ==========");
            let target = self.locator.wait_for_label(&self.labels.bootloader).await?;
            tracing::info!("Found {}, programming firmware...", target.display());
            self.flasher.flash_firmware(&target)?;
            actions.push(Action::FlashFirmware { target });
        }

        self.check_cancelled()?;
        let deploy = match plan.deploy {
            DeployDecision::Unconditional => true,
            DeployDecision::Confirm => self.confirm.confirm("redeploy code?"),
        };
        self.check_cancelled()?;
        if deploy {
            tracing::info!("========== DEPLOYING CODE ==========");
            let target = self.locator.wait_for_label(&self.labels.runtime).await?;
            let report = self.resolver.resolve(manifest, &target).await?;
            actions.push(Action::DeployCode {
                target,
                entries: report.entries.len(),
            });
            deployment = Some(report);
        } else {
            tracing::info!("Keeping the code already on the device");
            actions.push(Action::DeployDeclined);
        }

        if plan.calibrate {
            self.check_cancelled()?;
            tracing::info!("========== CALIBRATION & TEST ==========");
            self.calibrator.run_calibration()?;
            actions.push(Action::Calibrate);
        }

        Ok(ProvisioningReport {
            state,
            plan,
            actions,
            deployment,
        })
    }

    fn check_cancelled(&self) -> Result<(), FactoryError> {
        if self.cancel.is_cancelled() {
            tracing::warn!("Interrupted, not starting further steps");
            return Err(FactoryError::Interrupted);
        }
        Ok(())
    }

    fn check_artifacts(&self) -> Result<(), FlashError> {
        for path in self.flasher.required_artifacts() {
            if !path.is_file() {
                return Err(FlashError::MissingArtifact { path });
            }
        }
        Ok(())
    }
}
