//! CLI command implementation for device mode (`solfactory` with no argument)

use anyhow::{Context, Result};

use crate::cli::output::print_provisioning_report;
use crate::config::FactoryConfig;
use crate::core::provision::Provisioner;
use crate::core::resolver::ManifestResolver;
use crate::core::state::DeviceLabels;
use crate::infra::calibration::CommandCalibrator;
use crate::infra::download::HttpFetcher;
use crate::infra::flasher::JLinkFlasher;
use crate::infra::prompt::TerminalConfirm;
use crate::infra::signal::CancelFlag;
use crate::infra::volume::MountedVolumeLocator;

/// Provision the attached device
pub async fn execute(config: &FactoryConfig) -> Result<()> {
    let manifest = super::load_manifest(config)?;

    let cancel = CancelFlag::new();
    cancel.install_ctrlc_handler();

    let locator = MountedVolumeLocator::from_config(config, cancel.clone());
    tracing::debug!("Looking for volumes under {:?}", locator.mount_roots());

    let provisioner = Provisioner {
        locator,
        flasher: JLinkFlasher::from_config(config),
        calibrator: CommandCalibrator::from_config(config),
        confirm: TerminalConfirm,
        resolver: ManifestResolver::new(HttpFetcher::new()).with_cancel(cancel.clone()),
        labels: DeviceLabels {
            bootloader: config.bootloader_label().to_string(),
            runtime: config.runtime_label().to_string(),
        },
        cancel,
    };

    let report = provisioner
        .run(&manifest)
        .await
        .context("Provisioning failed")?;

    print_provisioning_report(&report);
    Ok(())
}
