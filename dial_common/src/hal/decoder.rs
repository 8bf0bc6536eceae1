//! Phase decoder contract.
//!
//! A decoder converts a (phase, motor selection) pair into physical drive
//! line assertions. One decoder exists per coil phase; together they let a
//! handful of pins address every motor on the board.

use crate::hal::types::{MotorMask, PhaseIndex};

/// Output sink for one coil phase.
///
/// The scheduler calls [`apply`](PhaseDecoder::apply) on every decoder once
/// per tick, from inside the tick handler.
///
/// # Timing Contracts
///
/// | Operation | Max Duration | RT Constraint |
/// |-----------|--------------|---------------|
/// | `apply()` | a few µs | **HARD** (no blocking, no allocation) |
///
/// # Output Contract
///
/// Each call fully replaces the previously driven pattern. Motors absent
/// from `selection` must end up de-energized on this decoder's lines, even
/// if they were selected on the previous call.
pub trait PhaseDecoder: Send {
    /// Drive this decoder's lines for `phase`, energizing exactly `selection`.
    fn apply(&mut self, phase: PhaseIndex, selection: MotorMask);
}

impl<D: PhaseDecoder + ?Sized> PhaseDecoder for Box<D> {
    fn apply(&mut self, phase: PhaseIndex, selection: MotorMask) {
        (**self).apply(phase, selection)
    }
}
