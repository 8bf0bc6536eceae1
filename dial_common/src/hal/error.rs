//! Error taxonomy for the motor scheduler.
//!
//! Missed tick deadlines are not errors; they are counted in the
//! scheduler's tick statistics instead.

use crate::config::ConfigError;
use thiserror::Error;

/// Error types for scheduler construction and control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotorError {
    /// Motor/phase count, decoder set or tick interval outside hardware limits.
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Motor id outside `[0, motor_count)`. Always a caller bug.
    #[error("Motor id {motor} out of range (motor_count={motor_count})")]
    RangeError {
        /// Offending raw id
        motor: i64,
        /// Configured motor count
        motor_count: usize,
    },

    /// Periodic timer could not be armed.
    #[error("Timer error: {0}")]
    TimerError(String),
}

impl From<ConfigError> for MotorError {
    fn from(e: ConfigError) -> Self {
        MotorError::ConfigError(e.to_string())
    }
}
