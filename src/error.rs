//! Error types for solfactory
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Deployment manifest errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The same source appears twice in one manifest
    #[error("Source '{source_desc}' appears more than once in the deployment manifest")]
    DuplicateSource { source_desc: String },

    /// Two entries resolve to the same place on the target
    #[error("Entry '{source_desc}' resolves to '{path}', which another entry already produced")]
    DestinationCollision { source_desc: String, path: PathBuf },

    /// Local source does not exist
    #[error("Source not found: {path}")]
    SourceMissing { path: PathBuf },

    /// Remote source without an archive entry part
    #[error("Remote source '{value}' must have the form <archive-url>:<entry-path>")]
    InvalidRemoteSource { value: String },

    /// Destination escapes the target root
    #[error("Destination '{value}' must be a relative path inside the target root")]
    InvalidDestination { value: String },

    /// Source has no usable file name
    #[error("Source '{source_desc}' has no base name")]
    NoBaseName { source_desc: String },
}

/// Download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Network error
    #[error("Network error downloading '{url}': {error}")]
    NetworkError { url: String, error: String },
}

/// Zip archive errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Response body is not a readable zip archive
    #[error("Archive from '{url}' is not a valid zip file: {error}")]
    Malformed { url: String, error: String },

    /// Requested entry is not in the archive
    #[error("Archive '{url}' has no entry '{entry}'")]
    EntryNotFound { url: String, entry: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy a file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to flush a path to disk
    #[error("Failed to flush '{path}': {error}")]
    Flush { path: PathBuf, error: String },
}

/// Volume waiting errors
///
/// A plain lookup never fails: a missing volume is `VolumeState::Absent`.
#[derive(Error, Debug)]
pub enum VolumeError {
    /// Wait interrupted by the operator
    #[error("Stopped waiting for volume '{label}': interrupted")]
    WaitCancelled { label: String },

    /// Volume did not appear in time
    #[error("Volume '{label}' did not appear within {seconds}s")]
    WaitTimedOut { label: String, seconds: u64 },
}

/// Flashing errors
#[derive(Error, Debug)]
pub enum FlashError {
    /// Required local artifact is missing
    #[error("Required artifact not found: {path}")]
    MissingArtifact { path: PathBuf },

    /// Programmer tool is not installed
    #[error("Programmer tool '{tool}' is not installed or not in PATH")]
    ToolNotFound { tool: String },

    /// Programmer tool exited unsuccessfully
    #[error("Programmer tool '{tool}' failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Programmer tool could not be started
    #[error("Failed to execute programmer tool '{tool}': {error}")]
    Spawn { tool: String, error: String },

    /// Writing the firmware image failed
    #[error("Failed to write firmware image: {0}")]
    Filesystem(#[from] FilesystemError),
}

/// Calibration errors
#[derive(Error, Debug)]
pub enum CalibrationError {
    /// No calibration command configured
    #[error("Calibration command is empty")]
    EmptyCommand,

    /// Calibration command could not be started
    #[error("Failed to start calibration '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Calibration command reported failure
    #[error("Calibration '{command}' failed ({status})")]
    Failed { command: String, status: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    ReadError { path: String, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    ParseError { path: String, error: String },
}

/// Top-level solfactory error type
#[derive(Error, Debug)]
pub enum FactoryError {
    /// Manifest error
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Download error
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive error
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Volume error
    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),

    /// Flash error
    #[error("Flash error: {0}")]
    Flash(#[from] FlashError),

    /// Calibration error
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationError),

    /// Config error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Operator pressed Ctrl-C
    #[error("Interrupted by operator")]
    Interrupted,
}
