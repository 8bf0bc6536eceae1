//! Per-motor run flags shared between the control API and the tick handler.
//!
//! One `AtomicBool` per motor. Start/Stop perform a single `Release` store on
//! one entry; the tick handler performs one `Acquire` load per entry. No
//! operation ever spans more than one motor, so a write to one motor can
//! never disturb another motor's entry.

use dial_common::consts::MAX_MOTORS;
use dial_common::hal::error::MotorError;
use dial_common::hal::types::MotorMask;
use std::sync::atomic::{AtomicBool, Ordering};

/// Fixed-size table of motor run flags, all stopped at creation.
#[derive(Debug)]
pub struct MotorEnableTable {
    flags: [AtomicBool; MAX_MOTORS],
    motor_count: usize,
}

impl MotorEnableTable {
    /// Create a table for `motor_count` motors, all stopped.
    ///
    /// # Errors
    /// `MotorError::ConfigError` unless `1 <= motor_count <= MAX_MOTORS`.
    pub fn new(motor_count: usize) -> Result<Self, MotorError> {
        if motor_count == 0 || motor_count > MAX_MOTORS {
            return Err(MotorError::ConfigError(format!(
                "motor_count must be in 1..={} (got {})",
                MAX_MOTORS, motor_count
            )));
        }
        Ok(Self {
            flags: std::array::from_fn(|_| AtomicBool::new(false)),
            motor_count,
        })
    }

    /// Number of motors covered by the table.
    #[inline]
    pub fn motor_count(&self) -> usize {
        self.motor_count
    }

    /// Set the run flag of one motor.
    ///
    /// # Errors
    /// `MotorError::RangeError` if `motor >= motor_count`.
    #[inline]
    pub fn set(&self, motor: usize, running: bool) -> Result<(), MotorError> {
        self.check(motor)?;
        self.flags[motor].store(running, Ordering::Release);
        Ok(())
    }

    /// Read the run flag of one motor.
    ///
    /// # Errors
    /// `MotorError::RangeError` if `motor >= motor_count`.
    #[inline]
    pub fn is_enabled(&self, motor: usize) -> Result<bool, MotorError> {
        self.check(motor)?;
        Ok(self.flags[motor].load(Ordering::Acquire))
    }

    /// Collect the running motors into a mask, one load per motor.
    ///
    /// Entries are sampled independently; a Start/Stop racing with this call
    /// is observed either now or on the next call.
    #[inline]
    pub fn running_mask(&self) -> MotorMask {
        let mut mask = MotorMask::empty();
        for (id, flag) in self.flags[..self.motor_count].iter().enumerate() {
            if flag.load(Ordering::Acquire) {
                mask |= MotorMask::motor(id);
            }
        }
        mask
    }

    fn check(&self, motor: usize) -> Result<(), MotorError> {
        if motor < self.motor_count {
            Ok(())
        } else {
            Err(MotorError::RangeError {
                motor: motor as i64,
                motor_count: self.motor_count,
            })
        }
    }
}
