//! Configuration loading tests through the public API.

use dial_common::prelude::*;
use serde::Deserialize;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Deserialize)]
struct BoardConfig {
    #[serde(default)]
    shared: SharedConfig,
    scheduler: SchedulerConfig,
    #[serde(default)]
    sensor: SensorConfig,
}

impl Validate for BoardConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        Validate::validate(&self.scheduler)?;
        self.sensor.validate()
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_board_config() {
    let file = write_config(
        r#"
[shared]
log_level = "debug"
service_name = "bench-01"

[scheduler]
motor_count = 9
phase_count = 4
direction = "backward"
tick_interval_us = 1500

[sensor]
pins = [17, 27, 22, 23]
"#,
    );

    let config = BoardConfig::load_validated(file.path()).unwrap();
    assert_eq!(config.shared.log_level, LogLevel::Debug);
    assert_eq!(config.scheduler.direction, Direction::Backward);
    assert_eq!(config.scheduler.tick_interval_us, 1500);
    assert_eq!(config.sensor.bit_count(), 4);
    assert_eq!(config.sensor.code_mask(), 0x0F);
}

#[test]
fn test_over_limit_board_rejected() {
    let file = write_config("[scheduler]\nmotor_count = 12\n");
    assert!(matches!(
        BoardConfig::load_validated(file.path()),
        Err(ConfigError::ValidationError(_))
    ));

    let file = write_config("[scheduler]\n[sensor]\npins = [1, 2, 3, 4, 5, 6, 7]\n");
    assert!(matches!(
        BoardConfig::load_validated(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        BoardConfig::load(&dir.path().join("absent.toml")),
        Err(ConfigError::FileNotFound)
    ));
}

#[test]
fn test_config_error_converts_to_motor_error() {
    let err: MotorError = ConfigError::ValidationError("bad".to_string()).into();
    assert!(matches!(err, MotorError::ConfigError(_)));
}
