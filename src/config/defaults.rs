//! Default configuration values

/// Volume label of the UF2 bootloader
pub const BOOTLOADER_LABEL: &str = "SOLBOOT";

/// Volume label of the CircuitPython runtime
pub const RUNTIME_LABEL: &str = "CIRCUITPY";

/// Entry-point file on the runtime volume
pub const CODE_MARKER: &str = "code.py";

/// Written to the runtime volume by a completed calibration
pub const CALIBRATION_MARKER: &str = "calibration.py";

/// Bootloader image expected in the working directory
pub const BOOTLOADER_IMAGE: &str = "bootloader.bin";

/// Firmware image expected in the working directory
pub const FIRMWARE_IMAGE: &str = "firmware.uf2";

/// File name the bootloader watches for on its volume
pub const FIRMWARE_TARGET_NAME: &str = "NEW.uf2";

/// J-Link target device
pub const JLINK_DEVICE: &str = "ATSAMD51J20";

/// J-Link debug interface
pub const JLINK_INTERFACE: &str = "SWD";

/// J-Link interface speed in kHz
pub const JLINK_SPEED_KHZ: u32 = 4000;

/// J-Link commander script that programs the bootloader
pub const JLINK_COMMANDER_SCRIPT: &str = "flash-bootloader.jlink";

/// Library directory created under every deployment root
pub const LIB_DIR: &str = "lib";

/// Publish mode output directory
pub const DISTRIBUTION_DIR: &str = "distribution";

/// Repository root, relative to the factory working directory
pub const PROJECT_ROOT: &str = "..";

/// Interval between volume lookups while waiting
pub const VOLUME_POLL_INTERVAL_MS: u64 = 1000;

/// Extra delay once a volume shows up after polling
pub const VOLUME_SETTLE_DELAY_MS: u64 = 1000;

/// Default calibration command
pub const CALIBRATION_COMMAND: &[&str] = &["python3", "libsol/calibrate.py"];

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "solfactory.toml";

/// Environment variable pointing at an explicit config file
pub const ENV_CONFIG_PATH: &str = "SOLFACTORY_CONFIG";

/// Platform default for the J-Link commander executable
pub fn jlink_path() -> &'static str {
    if cfg!(windows) {
        r"C:\Program Files (x86)\SEGGER\JLink\JLink.exe"
    } else {
        "JLinkExe"
    }
}
