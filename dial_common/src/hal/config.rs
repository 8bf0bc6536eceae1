//! Scheduler and sensor configuration types.
//!
//! - `SchedulerConfig` - Motor/phase counts, direction and tick interval
//! - `SensorConfig` - Photo sensor bit assignment

use crate::config::{ConfigError, Validate};
use crate::consts::{DEFAULT_TICK_INTERVAL_US, MAX_MOTORS, MAX_PHASES, MAX_SENSOR_BITS};
use crate::hal::error::MotorError;
use crate::hal::types::{Direction, MotorMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_motor_count() -> u8 {
    MotorMode::default().motor_count()
}

fn default_phase_count() -> u8 {
    MAX_PHASES as u8
}

fn default_tick_interval_us() -> u64 {
    DEFAULT_TICK_INTERVAL_US
}

/// Construction-time scheduler configuration (`[scheduler]` table).
///
/// # TOML Example
///
/// ```toml
/// [scheduler]
/// motor_count = 9
/// phase_count = 4
/// direction = "backward"
/// tick_interval_us = 2000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Number of motors on the board, `1..=MAX_MOTORS`.
    #[serde(default = "default_motor_count")]
    pub motor_count: u8,

    /// Number of coil phases (= decoders), `1..=MAX_PHASES`.
    #[serde(default = "default_phase_count")]
    pub phase_count: u8,

    /// Stepping order of the global phase counter.
    #[serde(default)]
    pub direction: Direction,

    /// Interval between ticks in microseconds.
    #[serde(default = "default_tick_interval_us")]
    pub tick_interval_us: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            motor_count: default_motor_count(),
            phase_count: default_phase_count(),
            direction: Direction::default(),
            tick_interval_us: default_tick_interval_us(),
        }
    }
}

impl SchedulerConfig {
    /// Configuration for a board population with the default cadence.
    pub fn for_mode(mode: MotorMode, direction: Direction) -> Self {
        Self {
            motor_count: mode.motor_count(),
            direction,
            ..Self::default()
        }
    }

    /// Tick interval as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(self.tick_interval_us)
    }

    /// Validate against hardware limits.
    ///
    /// # Validation Rules
    /// 1. `1 <= motor_count <= MAX_MOTORS`
    /// 2. `1 <= phase_count <= MAX_PHASES`
    /// 3. `tick_interval_us > 0`
    pub fn validate(&self) -> Result<(), MotorError> {
        if self.motor_count == 0 || self.motor_count as usize > MAX_MOTORS {
            return Err(MotorError::ConfigError(format!(
                "motor_count must be in 1..={} (got {})",
                MAX_MOTORS, self.motor_count
            )));
        }

        if self.phase_count == 0 || self.phase_count as usize > MAX_PHASES {
            return Err(MotorError::ConfigError(format!(
                "phase_count must be in 1..={} (got {})",
                MAX_PHASES, self.phase_count
            )));
        }

        if self.tick_interval_us == 0 {
            return Err(MotorError::ConfigError(
                "tick_interval_us must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Validate for SchedulerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        SchedulerConfig::validate(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Photo sensor wiring (`[sensor]` table).
///
/// `pins` lists the GPIO numbers of sensor bits 0, 1, ... in order.
/// Unlisted bit positions are unused and read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorConfig {
    /// GPIO number per sensor bit.
    #[serde(default)]
    pub pins: Vec<u8>,
}

impl SensorConfig {
    /// Number of sensor bits in use.
    pub fn bit_count(&self) -> usize {
        self.pins.len()
    }

    /// Mask of bits that can ever be set in a reading.
    pub fn code_mask(&self) -> u8 {
        ((1u16 << self.pins.len().min(8)) - 1) as u8
    }
}

impl Validate for SensorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.pins.len() > MAX_SENSOR_BITS {
            return Err(ConfigError::ValidationError(format!(
                "Too many sensor pins: {} (max {})",
                self.pins.len(),
                MAX_SENSOR_BITS
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for pin in &self.pins {
            if !seen.insert(pin) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate sensor pin: {}",
                    pin
                )));
            }
        }
        Ok(())
    }
}
