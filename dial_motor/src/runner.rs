//! Runner configuration and assembly.
//!
//! The `dial_motor` binary reads one TOML file:
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "dial_motor"
//!
//! [scheduler]
//! motor_count = 9
//! phase_count = 4
//! direction = "forward"
//! tick_interval_us = 2000
//!
//! [sensor]
//! pins = [17, 27, 22]
//! ```
//!
//! Every table is optional; missing tables take their defaults.

use crate::drivers::simulation::{DecoderProbe, SensorInput, SimulatedPhotoSensor, SimulationDecoder};
use crate::scheduler::MotorStepScheduler;
use crate::timer::ThreadTimer;
use dial_common::config::{ConfigError, ConfigLoader, SharedConfig, Validate};
use dial_common::hal::config::{SchedulerConfig, SensorConfig};
use dial_common::hal::error::MotorError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Name given to the tick thread.
pub const TICK_THREAD_NAME: &str = "dial-tick";

/// Complete runner configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Logging and instance identification.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Scheduler geometry and cadence.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Photo sensor wiring.
    #[serde(default)]
    pub sensor: SensorConfig,
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        Validate::validate(&self.scheduler)?;
        self.sensor.validate()
    }
}

impl RunnerConfig {
    /// Load and validate `path`, or fall back to defaults when it is absent.
    ///
    /// # Errors
    /// `ConfigError::ParseError` or `ConfigError::ValidationError` for a file
    /// that exists but is malformed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_validated(path) {
            Err(ConfigError::FileNotFound) => {
                info!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }
}

/// Scheduler on simulation hardware, paced by a thread timer.
pub struct SimulationRig {
    /// The running scheduler.
    pub scheduler: MotorStepScheduler<SimulationDecoder, ThreadTimer>,
    /// Output probe per phase decoder, slot order.
    pub probes: Vec<DecoderProbe>,
    /// Simulated dial sensor.
    pub sensor: SimulatedPhotoSensor,
    /// Injection handle for the sensor.
    pub sensor_input: SensorInput,
}

impl SimulationRig {
    /// Build decoders, sensor and timer from `config` and start ticking.
    ///
    /// # Errors
    /// Any `MotorError` from scheduler construction.
    pub fn new(config: &RunnerConfig) -> Result<Self, MotorError> {
        let (decoders, probes) =
            SimulationDecoder::bank(config.scheduler.phase_count as usize);
        let (sensor, sensor_input) = SimulatedPhotoSensor::new(config.sensor.bit_count());
        let scheduler = MotorStepScheduler::new(
            config.scheduler,
            decoders,
            ThreadTimer::new(TICK_THREAD_NAME),
        )?;
        Ok(Self {
            scheduler,
            probes,
            sensor,
            sensor_input,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dial_common::hal::types::Direction;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::load_or_default(&dir.path().join("motor.toml")).unwrap();
        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert!(config.sensor.pins.is_empty());
    }

    #[test]
    fn test_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[scheduler]
motor_count = 1
direction = "backward"

[sensor]
pins = [5, 6]
"#
        )
        .unwrap();

        let config = RunnerConfig::load_or_default(file.path()).unwrap();
        assert_eq!(config.scheduler.motor_count, 1);
        assert_eq!(config.scheduler.direction, Direction::Backward);
        assert_eq!(config.sensor.bit_count(), 2);
        assert_eq!(config.shared.service_name, "dial_motor");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[scheduler]\nphase_count = 8").unwrap();
        assert!(matches!(
            RunnerConfig::load_or_default(file.path()),
            Err(ConfigError::ValidationError(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[motors]\ncount = 3").unwrap();
        assert!(matches!(
            RunnerConfig::load_or_default(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_simulation_rig_ticks() {
        let config = RunnerConfig {
            scheduler: SchedulerConfig {
                tick_interval_us: 500,
                ..SchedulerConfig::default()
            },
            ..RunnerConfig::default()
        };
        let rig = SimulationRig::new(&config).unwrap();
        assert_eq!(rig.probes.len(), 4);
        rig.scheduler.start(0).unwrap();

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while rig.scheduler.stats().ticks < 8 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(1));
        }
        assert!(rig.scheduler.stats().ticks >= 8);
        let applies: u64 = rig.probes.iter().map(|p| p.applies()).sum();
        assert!(applies >= 8 * 4);
    }
}
