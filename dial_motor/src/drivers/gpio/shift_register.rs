//! Shift-register phase decoder.
//!
//! One serial-in/parallel-out register (74HC595 style) per phase, its
//! outputs wired to the phase winding driver of each motor. `apply` shifts
//! one bit per motor, highest motor first, then pulses the latch so all
//! outputs switch together. The latched word always replaces the previous
//! one; unselected motors are written low on every call.

use dial_common::consts::MAX_MOTORS;
use dial_common::hal::decoder::PhaseDecoder;
use dial_common::hal::types::{MotorMask, PhaseIndex};
use embedded_hal::digital::{OutputPin, PinState};

/// Phase decoder driving a latched shift register over three GPIOs.
pub struct ShiftRegisterDecoder<DATA, CLOCK, LATCH> {
    data: DATA,
    clock: CLOCK,
    latch: LATCH,
    motor_count: usize,
    faults: u32,
}

impl<DATA, CLOCK, LATCH> ShiftRegisterDecoder<DATA, CLOCK, LATCH>
where
    DATA: OutputPin,
    CLOCK: OutputPin,
    LATCH: OutputPin,
{
    /// Bind the register pins for a board with `motor_count` motors.
    pub fn new(data: DATA, clock: CLOCK, latch: LATCH, motor_count: usize) -> Self {
        Self {
            data,
            clock,
            latch,
            motor_count: motor_count.min(MAX_MOTORS),
            faults: 0,
        }
    }

    /// Pin writes that reported an error since creation.
    pub fn faults(&self) -> u32 {
        self.faults
    }

    /// Release the pins.
    pub fn free(self) -> (DATA, CLOCK, LATCH) {
        (self.data, self.clock, self.latch)
    }

    #[inline]
    fn check<E>(&mut self, result: Result<(), E>) {
        if result.is_err() {
            self.faults = self.faults.saturating_add(1);
        }
    }

    fn shift_bit(&mut self, high: bool) {
        let r = self.data.set_state(PinState::from(high));
        self.check(r);
        let r = self.clock.set_high();
        self.check(r);
        let r = self.clock.set_low();
        self.check(r);
    }
}

impl<DATA, CLOCK, LATCH> PhaseDecoder for ShiftRegisterDecoder<DATA, CLOCK, LATCH>
where
    DATA: OutputPin + Send,
    CLOCK: OutputPin + Send,
    LATCH: OutputPin + Send,
{
    fn apply(&mut self, _phase: PhaseIndex, selection: MotorMask) {
        for motor in (0..self.motor_count).rev() {
            self.shift_bit(selection.selects(motor));
        }
        let r = self.latch.set_high();
        self.check(r);
        let r = self.latch.set_low();
        self.check(r);
    }
}
