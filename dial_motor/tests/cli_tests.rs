//! Runner binary tests.
//!
//! Run the built `dial_motor` binary and check exit status and log output.

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

fn dial_motor(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dial_motor"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn log_text(output: &Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

#[test]
fn test_invalid_config_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[scheduler]\nphase_count = 8").unwrap();
    let path = file.path().to_str().unwrap();

    let output = dial_motor(&["--config", path, "--duration-ms", "100"]);
    let text = log_text(&output);
    assert_eq!(output.status.code(), Some(1), "output: {}", text);
    assert!(text.contains("dial_motor failed"), "output: {}", text);
    assert!(text.contains("phase_count"), "output: {}", text);
}

#[test]
fn test_unparsable_config_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[scheduler\nmotor_count = ").unwrap();
    let path = file.path().to_str().unwrap();

    let output = dial_motor(&["--config", path, "--duration-ms", "100"]);
    let text = log_text(&output);
    assert_eq!(output.status.code(), Some(1), "output: {}", text);
    assert!(text.contains("Failed to parse configuration"), "output: {}", text);
}

#[test]
fn test_out_of_range_motor_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("motor.toml");

    let output = dial_motor(&[
        "--config",
        path.to_str().unwrap(),
        "--motor",
        "9",
        "--duration-ms",
        "100",
    ]);
    let text = log_text(&output);
    assert_eq!(output.status.code(), Some(1), "output: {}", text);
    assert!(text.contains("out of range"), "output: {}", text);
}

#[test]
fn test_timed_run_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("motor.toml");

    let output = dial_motor(&[
        "--config",
        path.to_str().unwrap(),
        "--motor",
        "0",
        "--duration-ms",
        "100",
    ]);
    let text = log_text(&output);
    assert!(output.status.success(), "output: {}", text);
    assert!(text.contains("Tick summary"), "output: {}", text);
}

#[test]
fn test_shutdown_does_not_wait_out_a_long_tick() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[scheduler]\ntick_interval_us = 3000000").unwrap();
    let path = file.path().to_str().unwrap();

    let started = std::time::Instant::now();
    let output = dial_motor(&["--config", path, "--duration-ms", "100"]);
    let elapsed = started.elapsed();
    assert!(output.status.success(), "output: {}", log_text(&output));
    assert!(
        elapsed < std::time::Duration::from_secs(2),
        "run took {:?}",
        elapsed
    );
}
