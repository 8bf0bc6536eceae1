//! Motor and phase types shared by the scheduler and the decoders.
//!
//! - `MotorMask` - Set of motors addressed on a decoder's lines
//! - `PhaseIndex` - Position within the coil excitation cycle
//! - `Direction` - Stepping order
//! - `MotorMode` - One-motor or nine-motor board population
//! - `MotorId` - Checked conversion of raw motor identifiers

use crate::consts::MAX_MOTORS;
use crate::hal::error::MotorError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Set of motors selected on a decoder, bit `i` = motor `i`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MotorMask: u16 {
        /// Motor 0
        const MOTOR_0 = 1 << 0;
        /// Motor 1
        const MOTOR_1 = 1 << 1;
        /// Motor 2
        const MOTOR_2 = 1 << 2;
        /// Motor 3
        const MOTOR_3 = 1 << 3;
        /// Motor 4
        const MOTOR_4 = 1 << 4;
        /// Motor 5
        const MOTOR_5 = 1 << 5;
        /// Motor 6
        const MOTOR_6 = 1 << 6;
        /// Motor 7
        const MOTOR_7 = 1 << 7;
        /// Motor 8
        const MOTOR_8 = 1 << 8;
    }
}

impl MotorMask {
    /// Mask selecting a single motor. Ids at or above `MAX_MOTORS` select nothing.
    #[inline]
    pub const fn motor(id: usize) -> Self {
        if id < MAX_MOTORS {
            Self::from_bits_retain(1 << id)
        } else {
            Self::empty()
        }
    }

    /// Whether motor `id` is selected.
    #[inline]
    pub const fn selects(self, id: usize) -> bool {
        id < MAX_MOTORS && self.bits() & (1 << id) != 0
    }

    /// Iterate selected motor ids in ascending order.
    pub fn motor_ids(self) -> impl Iterator<Item = usize> {
        (0..MAX_MOTORS).filter(move |&id| self.selects(id))
    }
}

/// Stepping order of the phase counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Phase index increments: 0, 1, 2, 3, 0, ...
    #[default]
    Forward,
    /// Phase index decrements: 0, 3, 2, 1, 0, ...
    Backward,
}

/// Position within the excitation cycle, always `< phase_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PhaseIndex(u8);

impl PhaseIndex {
    /// First phase of the cycle.
    pub const ZERO: Self = Self(0);

    /// Build a phase index, wrapping `raw` into `[0, phase_count)`.
    #[inline]
    pub const fn new(raw: u8, phase_count: u8) -> Self {
        Self(raw % phase_count)
    }

    /// Raw index value.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Index as a decoder slot.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// The next phase in `direction`, modulo `phase_count`.
    #[inline]
    pub const fn step(self, direction: Direction, phase_count: u8) -> Self {
        match direction {
            Direction::Forward => Self((self.0 + 1) % phase_count),
            Direction::Backward => Self((self.0 + phase_count - 1) % phase_count),
        }
    }
}

impl core::fmt::Display for PhaseIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board population: a single test motor or the full nine-dial bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MotorMode {
    /// One motor (single-dial board).
    Single,
    /// Nine motors (full keyboard).
    #[default]
    Nine,
}

impl MotorMode {
    /// Number of motors driven in this mode.
    pub const fn motor_count(self) -> u8 {
        match self {
            MotorMode::Single => 1,
            MotorMode::Nine => 9,
        }
    }
}

/// Checked conversion of motor identifiers coming from outside the scheduler.
pub struct MotorId;

impl MotorId {
    /// Convert a raw signed id into an index in `[0, motor_count)`.
    ///
    /// # Errors
    /// `MotorError::RangeError` for negative ids and ids `>= motor_count`.
    pub fn checked(raw: i64, motor_count: usize) -> Result<usize, MotorError> {
        match usize::try_from(raw) {
            Ok(id) if id < motor_count => Ok(id),
            _ => Err(MotorError::RangeError {
                motor: raw,
                motor_count,
            }),
        }
    }
}
