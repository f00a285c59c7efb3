//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Factory bench in a temporary directory
///
/// Layout mirrors a checkout: `factory/` is the working directory, the
/// firmware and examples live beside it, and `volumes/` stands in for the
/// host's mount root.
pub struct TestBench {
    /// Temporary directory holding the whole bench
    pub dir: TempDir,
}

#[allow(dead_code)]
impl TestBench {
    /// Create an empty bench with its working directory
    pub fn new() -> Self {
        let bench = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        bench.create_dir("factory");
        bench.create_dir("volumes");
        bench
    }

    /// Get the path to the bench root
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Working directory the binary runs in
    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("factory")
    }

    /// Directory standing in for mounted volumes
    pub fn volumes(&self) -> PathBuf {
        self.dir.path().join("volumes")
    }

    /// Create a file relative to the bench root
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory relative to the bench root
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists relative to the bench root
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file relative to the bench root
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Populate the firmware and examples trees the built-in manifest expects
    pub fn create_sol_project(&self) {
        self.create_file("firmware/winterbloom_sol/__init__.py", "from .sol import *");
        self.create_file("firmware/winterbloom_sol/sol.py", "class Sol: pass");
        self.create_file("firmware/LICENSE", "MIT License");
        self.create_file("firmware/README.HTM", "<html>Sol</html>");
        self.create_file(
            "firmware/lib/adafruit_circuitpython_busdevice/adafruit_bus_device/i2c_device.py",
            "i2c",
        );
        self.create_file(
            "firmware/lib/winterbloom_ad_dacs/winterbloom_ad_dacs/ad5686.py",
            "dac",
        );
        self.create_file(
            "firmware/lib/winterbloom_voltageio/winterbloom_voltageio.py",
            "voltageio",
        );
        self.create_file(
            "firmware/lib/winterbloom_smolmidi/winterbloom_smolmidi.py",
            "smolmidi",
        );
        self.create_file("examples/1_default.py", "import winterbloom_sol");
        self.create_file("examples/2_arpeggio.py", "arp");
    }

    /// Write `factory/solfactory.toml`; mount roots always point at `volumes/`
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.work_dir().join("solfactory.toml");
        let content = format!(
            "[volumes]
mount_roots = [{:?}]
disk_labels = false
poll_interval_ms = 10
settle_delay_ms = 1
wait_timeout_secs = 1

{extra}",
            self.volumes().display().to_string()
        );
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }

    /// Run the binary in the working directory
    pub fn run(&self, args: &[&str]) -> Output {
        let config = self.work_dir().join("solfactory.toml");
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_solfactory"));
        cmd.current_dir(self.work_dir());
        cmd.env("SOLFACTORY_CONFIG_DIR", self.dir.path().join("user-config"));
        if config.exists() {
            cmd.env("SOLFACTORY_CONFIG", &config);
        }
        cmd.args(args);
        cmd.output().expect("Failed to execute solfactory")
    }
}

impl Default for TestBench {
    fn default() -> Self {
        Self::new()
    }
}
