//! Prelude module for common re-exports.
//!
//! ```rust
//! use dial_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig, Validate};
pub use crate::hal::config::{SchedulerConfig, SensorConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{MAX_MOTORS, MAX_PHASES, MAX_SENSOR_BITS};

// ─── Hardware Contracts ─────────────────────────────────────────────
pub use crate::hal::decoder::PhaseDecoder;
pub use crate::hal::error::MotorError;
pub use crate::hal::sensor::PhotoSensor;
pub use crate::hal::types::{Direction, MotorId, MotorMask, MotorMode, PhaseIndex};
