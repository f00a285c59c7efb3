//! Mounted volume lookup
//!
//! Volumes are found as entries of the platform mount roots whose name is
//! the volume label: `/Volumes/<label>` on macOS, `/media/<user>/<label>`
//! and friends on Linux. Windows has no such roots; there the OS disk list
//! is asked for the drive carrying the label. Exact matches win over
//! case-insensitive ones.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use sysinfo::{Disk, Disks};

use crate::config::FactoryConfig;
use crate::core::state::{VolumeLocator, VolumeState};
use crate::error::VolumeError;
use crate::infra::signal::CancelFlag;

/// How long [`VolumeLocator::wait_for_label`] may block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Until the volume appears or the wait is cancelled
    Unbounded,
    /// Give up after this long
    Bounded(Duration),
}

/// Locates volumes below a set of mount roots
#[derive(Debug, Clone)]
pub struct MountedVolumeLocator {
    mount_roots: Vec<PathBuf>,
    poll_interval: Duration,
    settle_delay: Duration,
    policy: WaitPolicy,
    disk_labels: bool,
    cancel: CancelFlag,
}

impl MountedVolumeLocator {
    pub fn new(mount_roots: Vec<PathBuf>, cancel: CancelFlag) -> Self {
        Self {
            mount_roots,
            poll_interval: Duration::from_millis(crate::config::defaults::VOLUME_POLL_INTERVAL_MS),
            settle_delay: Duration::from_millis(crate::config::defaults::VOLUME_SETTLE_DELAY_MS),
            policy: WaitPolicy::Unbounded,
            disk_labels: cfg!(windows),
            cancel,
        }
    }

    /// Build a locator from configuration
    pub fn from_config(config: &FactoryConfig, cancel: CancelFlag) -> Self {
        let roots = config
            .volumes
            .mount_roots
            .clone()
            .unwrap_or_else(default_mount_roots);

        Self::new(roots, cancel)
            .with_timing(config.poll_interval(), config.settle_delay())
            .with_policy(config.wait_timeout().map_or(WaitPolicy::Unbounded, WaitPolicy::Bounded))
            .with_disk_labels(config.disk_labels())
    }

    #[must_use]
    pub fn with_timing(mut self, poll_interval: Duration, settle_delay: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.settle_delay = settle_delay;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: WaitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Also match labels from the OS disk list
    #[must_use]
    pub fn with_disk_labels(mut self, enabled: bool) -> Self {
        self.disk_labels = enabled;
        self
    }

    pub fn mount_roots(&self) -> &[PathBuf] {
        &self.mount_roots
    }

    fn lookup(&self, label: &str) -> Option<PathBuf> {
        self.mount_roots
            .iter()
            .find_map(|root| find_in_root(root, label))
            .or_else(|| {
                if self.disk_labels {
                    find_labelled_disk(label)
                } else {
                    None
                }
            })
    }
}

impl VolumeLocator for MountedVolumeLocator {
    fn find_by_label(&self, label: &str) -> VolumeState {
        match self.lookup(label) {
            Some(path) => VolumeState::Present(path),
            None => VolumeState::Absent,
        }
    }

    async fn wait_for_label(&self, label: &str) -> Result<PathBuf, VolumeError> {
        let started = Instant::now();
        let mut polls = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(VolumeError::WaitCancelled {
                    label: label.to_string(),
                });
            }

            if let Some(path) = self.lookup(label) {
                if polls > 0 {
                    // Freshly mounted volumes are not always writable yet
                    tokio::time::sleep(self.settle_delay).await;
                }
                tracing::debug!("Found volume {label} at {}", path.display());
                return Ok(path);
            }

            if let WaitPolicy::Bounded(limit) = self.policy {
                if started.elapsed() >= limit {
                    return Err(VolumeError::WaitTimedOut {
                        label: label.to_string(),
                        seconds: limit.as_secs(),
                    });
                }
            }

            if polls == 0 {
                tracing::info!("Waiting for {label} volume...");
            }
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

fn find_in_root(root: &Path, label: &str) -> Option<PathBuf> {
    let exact = root.join(label);
    if exact.is_dir() {
        return Some(exact);
    }

    std::fs::read_dir(root)
        .ok()?
        .filter_map(Result::ok)
        .find(|entry| {
            entry.file_name().to_string_lossy().eq_ignore_ascii_case(label)
                && entry.path().is_dir()
        })
        .map(|entry| entry.path())
}

/// Mount point of the disk whose volume label is `label`
///
/// On Windows the disk name is the volume label and the mount point is the
/// drive root (`E:\`).
fn find_labelled_disk(label: &str) -> Option<PathBuf> {
    let disks = Disks::new_with_refreshed_list();
    let list = disks.list();

    list.iter()
        .find(|disk| disk_name(disk) == label)
        .or_else(|| list.iter().find(|disk| disk_name(disk).eq_ignore_ascii_case(label)))
        .map(|disk| disk.mount_point().to_path_buf())
}

fn disk_name(disk: &Disk) -> String {
    disk.name().to_string_lossy().into_owned()
}

/// Mount roots for the current platform
///
/// Empty on Windows, where lookup goes through volume labels instead.
pub fn default_mount_roots() -> Vec<PathBuf> {
    if cfg!(windows) {
        return Vec::new();
    }
    if cfg!(target_os = "macos") {
        return vec![PathBuf::from("/Volumes")];
    }

    let mut roots = Vec::new();
    if let Ok(user) = std::env::var("USER") {
        roots.push(PathBuf::from("/media").join(&user));
        roots.push(PathBuf::from("/run/media").join(&user));
    }
    roots.push(PathBuf::from("/media"));
    roots.push(PathBuf::from("/mnt"));
    roots
}
