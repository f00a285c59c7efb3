//! Deployment manifest resolution
//!
//! Materializes every manifest entry under a target root, in manifest order:
//!
//! - archive entries are fetched, read from the zip in memory and written as
//!   `destination/<entry base name>`
//! - directories replace `destination/<dir name>` wholesale
//! - files are copied into `destination` when it is a directory, or to
//!   `destination` itself otherwise (rename)
//!
//! Bytecode caches are stripped from local source directories first. The
//! target is flushed after the last entry, also when an entry failed.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::manifest::{DeploymentManifest, ManifestEntry, SourceDescriptor};
use crate::error::{DownloadError, FactoryError, ManifestError};
use crate::infra::signal::CancelFlag;
use crate::infra::{download, filesystem};

/// Fetches raw archive bytes
#[allow(async_fn_in_trait)]
pub trait ArchiveFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// One materialized entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    /// Source as written in the manifest
    pub source: String,
    /// Final path on the target
    pub destination: PathBuf,
}

/// Result of a resolver run
#[derive(Debug, Default)]
pub struct ResolveReport {
    pub target_root: PathBuf,
    pub entries: Vec<ResolvedEntry>,
}

/// Resolves manifests using a given archive fetcher
pub struct ManifestResolver<F> {
    fetcher: F,
    cancel: CancelFlag,
}

impl<F: ArchiveFetcher> ManifestResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cancel: CancelFlag::new(),
        }
    }

    /// Stop between entries once `cancel` is set
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Materialize `manifest` under `target_root`
    pub async fn resolve(
        &self,
        manifest: &DeploymentManifest,
        target_root: &Path,
    ) -> Result<ResolveReport, FactoryError> {
        let mut report = ResolveReport {
            target_root: target_root.to_path_buf(),
            entries: Vec::with_capacity(manifest.len()),
        };
        let outcome = self.resolve_entries(manifest, target_root, &mut report).await;

        // Always flush, the volume may be unplugged right after we return
        let flushed = filesystem::flush(target_root);

        outcome?;
        flushed?;
        Ok(report)
    }

    async fn resolve_entries(
        &self,
        manifest: &DeploymentManifest,
        target_root: &Path,
        report: &mut ResolveReport,
    ) -> Result<(), FactoryError> {
        for dir in manifest.local_directories() {
            let removed = filesystem::clean_pycache(dir)?;
            if removed > 0 {
                tracing::debug!(
                    "Removed {removed} bytecode cache entries from {}",
                    dir.display()
                );
            }
        }

        filesystem::create_dir_all(&target_root.join(defaults::LIB_DIR))?;

        // Final paths produced so far, and whether a whole tree/archive made them
        let mut claimed: HashMap<PathBuf, bool> = HashMap::new();

        for entry in manifest.entries() {
            self.check_cancelled()?;
            let destination = self
                .resolve_entry(entry, target_root, &mut claimed)
                .await?;

            tracing::info!("Copied {} to {}", entry.source, destination.display());
            report.entries.push(ResolvedEntry {
                source: entry.source.to_string(),
                destination,
            });
        }

        Ok(())
    }

    fn check_cancelled(&self) -> Result<(), FactoryError> {
        if self.cancel.is_cancelled() {
            return Err(FactoryError::Interrupted);
        }
        Ok(())
    }

    async fn resolve_entry(
        &self,
        entry: &ManifestEntry,
        target_root: &Path,
        claimed: &mut HashMap<PathBuf, bool>,
    ) -> Result<PathBuf, FactoryError> {
        let dest_dir = entry.destination.under(target_root);

        match &entry.source {
            SourceDescriptor::RemoteArchiveEntry {
                archive_url,
                entry_path,
            } => {
                let final_path = dest_dir.join(base_name(&entry.source)?);
                claim(claimed, &entry.source, &final_path, true)?;

                let data = self.fetcher.fetch(archive_url).await?;
                self.check_cancelled()?;
                let content = download::read_zip_entry(archive_url, data, entry_path)?;
                filesystem::write_bytes(&final_path, &content)?;
                Ok(final_path)
            }
            SourceDescriptor::LocalDirectory(path) => {
                if !path.is_dir() {
                    return Err(ManifestError::SourceMissing { path: path.clone() }.into());
                }
                let final_path = dest_dir.join(base_name(&entry.source)?);
                claim(claimed, &entry.source, &final_path, true)?;

                if final_path.is_dir() {
                    filesystem::remove_dir_all(&final_path)?;
                } else if final_path.exists() {
                    filesystem::remove_file(&final_path)?;
                }
                filesystem::copy_dir_recursive(path, &final_path)?;
                Ok(final_path)
            }
            SourceDescriptor::LocalFile(path) => {
                if !path.is_file() {
                    return Err(ManifestError::SourceMissing { path: path.clone() }.into());
                }
                let final_path = if dest_dir.is_dir() {
                    dest_dir.join(base_name(&entry.source)?)
                } else {
                    dest_dir
                };
                claim(claimed, &entry.source, &final_path, false)?;

                if let Some(parent) = final_path.parent() {
                    filesystem::create_dir_all(parent)?;
                }
                filesystem::copy_file(path, &final_path)?;
                Ok(final_path)
            }
        }
    }
}

fn base_name(source: &SourceDescriptor) -> Result<String, ManifestError> {
    source.base_name().ok_or_else(|| ManifestError::NoBaseName {
        source_desc: source.to_string(),
    })
}

/// Record `path` as produced by `source`
///
/// Directory and archive entries may not land on a path any other entry
/// produced, and nothing may land on theirs.
fn claim(
    claimed: &mut HashMap<PathBuf, bool>,
    source: &SourceDescriptor,
    path: &Path,
    exclusive: bool,
) -> Result<(), ManifestError> {
    match claimed.get(path) {
        Some(&held_exclusively) if exclusive || held_exclusively => {
            Err(ManifestError::DestinationCollision {
                source_desc: source.to_string(),
                path: path.to_path_buf(),
            })
        }
        _ => {
            claimed.insert(path.to_path_buf(), exclusive);
            Ok(())
        }
    }
}
