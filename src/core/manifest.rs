//! Deployment manifest
//!
//! An ordered list of (source, destination) pairs describing what lands on a
//! deployment root. Order is deployment order; each source appears once.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::config::settings::DeployEntryConfig;
use crate::config::urls;
use crate::error::ManifestError;

/// Where the content of an entry comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceDescriptor {
    /// An existing regular file
    LocalFile(PathBuf),
    /// An existing directory, copied recursively
    LocalDirectory(PathBuf),
    /// One entry of a zip archive fetched over HTTP
    RemoteArchiveEntry {
        archive_url: String,
        entry_path: String,
    },
}

impl SourceDescriptor {
    /// Parse the textual form of a source
    ///
    /// `http(s)://host/archive.zip:inner/path` is a remote archive entry,
    /// split on the last `:`. Anything else is a local path relative to
    /// `base`; it is a directory if one exists there and a file otherwise.
    pub fn parse(value: &str, base: &Path) -> Result<Self, ManifestError> {
        if is_remote(value) {
            let invalid = || ManifestError::InvalidRemoteSource {
                value: value.to_string(),
            };
            let (archive_url, entry_path) = value.rsplit_once(':').ok_or_else(invalid)?;
            // "https://host" alone splits on the scheme separator
            if entry_path.is_empty() || entry_path.starts_with("//") || !is_remote(archive_url) {
                return Err(invalid());
            }
            return Ok(Self::remote(archive_url, entry_path));
        }

        Ok(Self::local(base.join(value)))
    }

    /// Classify a local path by what is on disk
    pub fn local(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            Self::LocalDirectory(path)
        } else {
            Self::LocalFile(path)
        }
    }

    pub fn remote(archive_url: impl Into<String>, entry_path: impl Into<String>) -> Self {
        Self::RemoteArchiveEntry {
            archive_url: archive_url.into(),
            entry_path: entry_path.into(),
        }
    }

    pub fn is_local(&self) -> bool {
        !matches!(self, Self::RemoteArchiveEntry { .. })
    }

    /// Last path segment: the file or directory name that lands on the target
    pub fn base_name(&self) -> Option<String> {
        match self {
            Self::LocalFile(path) | Self::LocalDirectory(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Self::RemoteArchiveEntry { entry_path, .. } => entry_path
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalFile(path) | Self::LocalDirectory(path) => write!(f, "{}", path.display()),
            Self::RemoteArchiveEntry {
                archive_url,
                entry_path,
            } => write!(f, "{archive_url}:{entry_path}"),
        }
    }
}

fn is_remote(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

/// Root-relative destination of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationDescriptor {
    /// Directly under the root (`"."`)
    Root,
    /// A relative path under the root
    Path(PathBuf),
}

impl DestinationDescriptor {
    /// Parse a destination; it must stay inside the target root
    pub fn parse(value: &str) -> Result<Self, ManifestError> {
        let trimmed = value.trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            return Ok(Self::Root);
        }

        let path = PathBuf::from(trimmed);
        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ManifestError::InvalidDestination {
                value: value.to_string(),
            });
        }

        Ok(Self::Path(path))
    }

    /// Absolute location of this destination under `root`
    pub fn under(&self, root: &Path) -> PathBuf {
        match self {
            Self::Root => root.to_path_buf(),
            Self::Path(rel) => root.join(rel),
        }
    }
}

impl fmt::Display for DestinationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("."),
            Self::Path(rel) => write!(f, "{}", rel.display()),
        }
    }
}

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub source: SourceDescriptor,
    pub destination: DestinationDescriptor,
}

/// Ordered, duplicate-free list of deployment entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentManifest {
    entries: Vec<ManifestEntry>,
}

impl DeploymentManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, rejecting a source that is already present
    pub fn push(
        &mut self,
        source: SourceDescriptor,
        destination: DestinationDescriptor,
    ) -> Result<(), ManifestError> {
        if self.entries.iter().any(|e| e.source == source) {
            return Err(ManifestError::DuplicateSource {
                source_desc: source.to_string(),
            });
        }
        self.entries.push(ManifestEntry {
            source,
            destination,
        });
        Ok(())
    }

    /// Builder-style [`push`](Self::push)
    pub fn with(
        mut self,
        source: SourceDescriptor,
        destination: DestinationDescriptor,
    ) -> Result<Self, ManifestError> {
        self.push(source, destination)?;
        Ok(self)
    }

    /// Build a manifest from `[[deploy]]` configuration entries
    pub fn from_entries(
        project_root: &Path,
        entries: &[DeployEntryConfig],
    ) -> Result<Self, ManifestError> {
        let mut manifest = Self::new();
        for entry in entries {
            manifest.push(
                SourceDescriptor::parse(&entry.source, project_root)?,
                DestinationDescriptor::parse(&entry.destination)?,
            )?;
        }
        Ok(manifest)
    }

    /// The standard Sol deployment: runtime library, dependencies, docs,
    /// examples, and the default example as `code.py`
    pub fn factory_default(project_root: &Path) -> Result<Self, ManifestError> {
        let firmware = project_root.join("firmware");
        let lib = firmware.join("lib");
        let examples = project_root.join("examples");
        let to = DestinationDescriptor::parse;

        Self::new()
            .with(
                SourceDescriptor::remote(urls::NEOPIXEL_ARCHIVE, urls::NEOPIXEL_ENTRY),
                to("lib")?,
            )?
            .with(
                SourceDescriptor::LocalDirectory(firmware.join("winterbloom_sol")),
                to("lib")?,
            )?
            .with(
                SourceDescriptor::LocalFile(firmware.join("LICENSE")),
                to(".")?,
            )?
            .with(
                SourceDescriptor::LocalFile(firmware.join("README.HTM")),
                to(".")?,
            )?
            .with(
                SourceDescriptor::LocalDirectory(
                    lib.join("adafruit_circuitpython_busdevice")
                        .join("adafruit_bus_device"),
                ),
                to("lib")?,
            )?
            .with(
                SourceDescriptor::LocalDirectory(
                    lib.join("winterbloom_ad_dacs").join("winterbloom_ad_dacs"),
                ),
                to("lib")?,
            )?
            .with(
                SourceDescriptor::LocalFile(
                    lib.join("winterbloom_voltageio")
                        .join("winterbloom_voltageio.py"),
                ),
                to("lib")?,
            )?
            .with(
                SourceDescriptor::LocalFile(
                    lib.join("winterbloom_smolmidi").join("winterbloom_smolmidi.py"),
                ),
                to("lib")?,
            )?
            .with(SourceDescriptor::LocalDirectory(examples.clone()), to(".")?)?
            .with(
                SourceDescriptor::LocalFile(examples.join("1_default.py")),
                to("code.py")?,
            )
    }

    /// Keep only entries with local sources, preserving order
    #[must_use]
    pub fn local_only(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| e.source.is_local())
                .cloned()
                .collect(),
        }
    }

    /// Local directories that are copied as a whole
    pub fn local_directories(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().filter_map(|e| match &e.source {
            SourceDescriptor::LocalDirectory(path) => Some(path.as_path()),
            _ => None,
        })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::generators::{archive_entry_path, archive_url};
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_remote_source_splits_on_last_colon() {
        let source = SourceDescriptor::parse(
            "https://example.com/releases/bundle.zip:bundle/lib/neopixel.mpy",
            Path::new("/unused"),
        )
        .unwrap();

        assert_eq!(
            source,
            SourceDescriptor::remote(
                "https://example.com/releases/bundle.zip",
                "bundle/lib/neopixel.mpy"
            )
        );
        assert_eq!(source.base_name().as_deref(), Some("neopixel.mpy"));
    }

    #[test]
    fn test_parse_remote_source_with_port() {
        let source =
            SourceDescriptor::parse("http://127.0.0.1:8080/a.zip:a/b.py", Path::new(".")).unwrap();
        assert_eq!(
            source,
            SourceDescriptor::remote("http://127.0.0.1:8080/a.zip", "a/b.py")
        );
    }

    #[test]
    fn test_parse_remote_source_without_entry_fails() {
        let result = SourceDescriptor::parse("https://example.com/bundle.zip", Path::new("."));
        assert!(matches!(
            result,
            Err(ManifestError::InvalidRemoteSource { .. })
        ));
    }

    #[test]
    fn test_parse_local_source_classifies_by_disk() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("examples")).unwrap();
        std::fs::write(temp.path().join("LICENSE"), "MIT").unwrap();

        assert_eq!(
            SourceDescriptor::parse("examples", temp.path()).unwrap(),
            SourceDescriptor::LocalDirectory(temp.path().join("examples"))
        );
        assert_eq!(
            SourceDescriptor::parse("LICENSE", temp.path()).unwrap(),
            SourceDescriptor::LocalFile(temp.path().join("LICENSE"))
        );
        // Missing paths stay files and fail at resolution time
        assert_eq!(
            SourceDescriptor::parse("missing", temp.path()).unwrap(),
            SourceDescriptor::LocalFile(temp.path().join("missing"))
        );
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!(DestinationDescriptor::parse(".").unwrap(), DestinationDescriptor::Root);
        assert_eq!(DestinationDescriptor::parse("").unwrap(), DestinationDescriptor::Root);
        assert_eq!(
            DestinationDescriptor::parse("lib/").unwrap(),
            DestinationDescriptor::Path(PathBuf::from("lib"))
        );
        assert!(DestinationDescriptor::parse("../outside").is_err());
        assert!(DestinationDescriptor::parse("/abs").is_err());
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut manifest = DeploymentManifest::new();
        let source = SourceDescriptor::LocalFile(PathBuf::from("a.py"));
        manifest
            .push(source.clone(), DestinationDescriptor::Root)
            .unwrap();

        let result = manifest.push(source, DestinationDescriptor::parse("code.py").unwrap());
        assert!(matches!(result, Err(ManifestError::DuplicateSource { .. })));
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_factory_default_order_and_shape() {
        let manifest = DeploymentManifest::factory_default(Path::new("/repo")).unwrap();
        let entries = manifest.entries();

        assert_eq!(entries.len(), 10);
        assert!(!entries[0].source.is_local());
        assert_eq!(
            entries[8].source,
            SourceDescriptor::LocalDirectory(PathBuf::from("/repo/examples"))
        );
        assert_eq!(
            entries[9].destination,
            DestinationDescriptor::Path(PathBuf::from("code.py"))
        );
    }

    #[test]
    fn test_local_only_drops_remote_and_keeps_order() {
        let manifest = DeploymentManifest::factory_default(Path::new("/repo")).unwrap();
        let local = manifest.local_only();

        assert_eq!(local.len(), manifest.len() - 1);
        assert!(local.entries().iter().all(|e| e.source.is_local()));
        assert_eq!(local.entries()[0], manifest.entries()[1]);
    }

    #[test]
    fn test_from_entries() {
        let entries = vec![
            DeployEntryConfig {
                source: "firmware/LICENSE".to_string(),
                destination: ".".to_string(),
            },
            DeployEntryConfig {
                source: "https://example.com/x.zip:x/lib/y.mpy".to_string(),
                destination: "lib".to_string(),
            },
        ];

        let manifest = DeploymentManifest::from_entries(Path::new("/repo"), &entries).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(
            manifest.entries()[0].source,
            SourceDescriptor::LocalFile(PathBuf::from("/repo/firmware/LICENSE"))
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The landed name of an archive entry is its last segment at any depth
        #[test]
        fn prop_remote_base_name_is_last_segment(
            url in archive_url(),
            entry in archive_entry_path(),
        ) {
            let text = format!("{url}:{entry}");
            let source = SourceDescriptor::parse(&text, Path::new(".")).unwrap();
            let expected = entry.rsplit('/').next().unwrap().to_string();

            prop_assert_eq!(source.base_name(), Some(expected));
            prop_assert_eq!(source.to_string(), text);
        }
    }
}
