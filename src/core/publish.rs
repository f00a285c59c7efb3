//! Publish mode
//!
//! Produces a distributable bundle: the local entries of the deployment
//! manifest resolved into a plain directory. No volumes, no flashing, no
//! calibration.

use std::path::Path;

use crate::core::manifest::DeploymentManifest;
use crate::core::resolver::{ArchiveFetcher, ManifestResolver, ResolveReport};
use crate::error::FactoryError;

/// Resolve the local part of `manifest` into `distribution_dir`
pub async fn publish<A: ArchiveFetcher>(
    resolver: &ManifestResolver<A>,
    manifest: &DeploymentManifest,
    distribution_dir: &Path,
) -> Result<ResolveReport, FactoryError> {
    let local = manifest.local_only();
    let skipped = manifest.len() - local.len();
    if skipped > 0 {
        tracing::info!("Skipping {skipped} remote entries for the distribution bundle");
    }

    tracing::info!("Publishing to {}", distribution_dir.display());
    resolver.resolve(&local, distribution_dir).await
}
