//! Integration tests for `solfactory publish`
//!
//! - Resolves the local manifest entries into `distribution/`
//! - Never touches volumes, the programmer or calibration
//! - Honours `[[deploy]]` entries from the config file

mod common;

use common::TestBench;

#[test]
fn test_publish_builds_distribution_from_builtin_manifest() {
    let bench = TestBench::new();
    bench.create_sol_project();

    let output = bench.run(&["publish"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "publish failed: {stderr}");

    let dist = "factory/distribution";
    assert_eq!(bench.read_file(&format!("{dist}/LICENSE")), "MIT License");
    assert!(bench.file_exists(&format!("{dist}/README.HTM")));
    assert!(bench.file_exists(&format!("{dist}/lib/winterbloom_sol/sol.py")));
    assert!(bench.file_exists(&format!("{dist}/lib/adafruit_bus_device/i2c_device.py")));
    assert!(bench.file_exists(&format!("{dist}/lib/winterbloom_ad_dacs/ad5686.py")));
    assert!(bench.file_exists(&format!("{dist}/lib/winterbloom_voltageio.py")));
    assert!(bench.file_exists(&format!("{dist}/lib/winterbloom_smolmidi.py")));
    assert!(bench.file_exists(&format!("{dist}/examples/2_arpeggio.py")));
    assert_eq!(
        bench.read_file(&format!("{dist}/code.py")),
        "import winterbloom_sol"
    );
    // Remote archive entries are not part of the bundle
    assert!(!bench.file_exists(&format!("{dist}/lib/neopixel.mpy")));
}

#[test]
fn test_publish_ignores_device_state() {
    let bench = TestBench::new();
    bench.create_sol_project();
    // A mounted runtime volume and a failing programmer/calibration must not matter
    bench.create_file("volumes/CIRCUITPY/code.py", "old");
    bench.write_config(
        r#"[flash]
jlink_path = "solfactory-missing-jlink"

[calibration]
command = ["false"]
"#,
    );

    let output = bench.run(&["publish"]);
    assert!(
        output.status.success(),
        "publish failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(bench.read_file("volumes/CIRCUITPY/code.py"), "old");
    assert!(!bench.file_exists("factory/distribution/NEW.uf2"));
}

#[test]
fn test_publish_replaces_stale_distribution() {
    let bench = TestBench::new();
    bench.create_sol_project();
    bench.create_file("factory/distribution/examples/removed_example.py", "stale");

    let output = bench.run(&["publish"]);
    assert!(output.status.success());

    assert!(!bench.file_exists("factory/distribution/examples/removed_example.py"));
    assert!(bench.file_exists("factory/distribution/examples/1_default.py"));
}

#[test]
fn test_publish_with_configured_manifest() {
    let bench = TestBench::new();
    bench.create_file("app/main.py", "print('hi')");
    bench.create_file("app/assets/wave.txt", "sine");
    bench.write_config(
        r#"[paths]
distribution = "bundle"

[[deploy]]
source = "app/assets"
destination = "."

[[deploy]]
source = "app/main.py"
destination = "code.py"
"#,
    );

    let output = bench.run(&["publish"]);
    assert!(
        output.status.success(),
        "publish failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert_eq!(bench.read_file("factory/bundle/code.py"), "print('hi')");
    assert_eq!(bench.read_file("factory/bundle/assets/wave.txt"), "sine");
    assert!(bench.file_exists("factory/bundle/lib"));
}

#[test]
fn test_publish_missing_source_fails() {
    let bench = TestBench::new();
    // No project tree at all

    let output = bench.run(&["publish"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("not found"), "unexpected stderr: {stderr}");
}
