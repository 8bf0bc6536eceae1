//! System-wide constants for the dial motor workspace.
//!
//! Single source of truth for hardware limits and defaults.
//! Imported by all crates.

use static_assertions::const_assert;

/// Maximum number of motors the decoder hardware can address.
pub const MAX_MOTORS: usize = 9;

/// Maximum number of coil phases (one decoder per phase).
pub const MAX_PHASES: usize = 4;

/// Maximum number of photo sensor bits sampled per read.
pub const MAX_SENSOR_BITS: usize = 6;

/// Default interval between two phase steps in microseconds (500 steps/s).
pub const DEFAULT_TICK_INTERVAL_US: u64 = 2000;

/// Default configuration file path for the runner.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/dial/motor.toml";

/// Service name used for logging.
pub const MOTOR_SERVICE_NAME: &str = "dial_motor";

// Motor selections are packed into a `u16` mask.
const_assert!(MAX_MOTORS <= 16);
// Sensor codes are packed into a `u8`.
const_assert!(MAX_SENSOR_BITS <= 8);
const_assert!(MAX_PHASES >= 1);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(MAX_MOTORS > 0);
        assert!(MAX_PHASES > 0 && MAX_PHASES <= 8);
        assert!(DEFAULT_TICK_INTERVAL_US > 0);
    }

    #[test]
    fn sensor_code_fits_in_byte() {
        assert!((1u16 << MAX_SENSOR_BITS) - 1 <= u8::MAX as u16);
    }
}
