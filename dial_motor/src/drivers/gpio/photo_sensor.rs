//! Photo-interrupter dial sensor on GPIO inputs.
//!
//! Up to `MAX_SENSOR_BITS` inputs, pin `i` supplying bit `i` of the raw
//! code. Boards with fewer sensors leave the upper pins unassigned; the pin
//! list ends at the first unassigned entry.

use dial_common::consts::MAX_SENSOR_BITS;
use dial_common::hal::error::MotorError;
use dial_common::hal::sensor::PhotoSensor;
use embedded_hal::digital::InputPin;
use tracing::debug;

/// Raw code reader over a set of GPIO inputs.
pub struct GpioPhotoSensor<P> {
    pins: heapless::Vec<P, MAX_SENSOR_BITS>,
    read_errors: u32,
}

impl<P: InputPin + Send> GpioPhotoSensor<P> {
    /// Bind sensor pins, bit 0 first.
    ///
    /// Stops at the first `None`; later entries are ignored.
    ///
    /// # Errors
    /// `MotorError::ConfigError` if more than `MAX_SENSOR_BITS` pins are assigned.
    pub fn new<I>(pins: I) -> Result<Self, MotorError>
    where
        I: IntoIterator<Item = Option<P>>,
    {
        let mut bound: heapless::Vec<P, MAX_SENSOR_BITS> = heapless::Vec::new();
        for pin in pins.into_iter().map_while(|p| p) {
            bound.push(pin).map_err(|_| {
                MotorError::ConfigError(format!(
                    "at most {} sensor pins supported",
                    MAX_SENSOR_BITS
                ))
            })?;
        }
        debug!("GpioPhotoSensor bound {} pins", bound.len());
        Ok(Self {
            pins: bound,
            read_errors: 0,
        })
    }

    /// Number of wired sensor bits.
    pub fn bit_count(&self) -> usize {
        self.pins.len()
    }

    /// Pin reads that failed since creation.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}

impl<P: InputPin + Send> PhotoSensor for GpioPhotoSensor<P> {
    fn read(&mut self) -> u8 {
        let mut code = 0u8;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            match pin.is_high() {
                Ok(true) => code |= 1 << bit,
                Ok(false) => {}
                Err(_) => self.read_errors = self.read_errors.saturating_add(1),
            }
        }
        code
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    enum FakeInput {
        Level(bool),
        Broken,
    }

    impl ErrorType for FakeInput {
        type Error = ErrorKind;
    }

    impl InputPin for FakeInput {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            match self {
                FakeInput::Level(level) => Ok(*level),
                FakeInput::Broken => Err(ErrorKind::Other),
            }
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            self.is_high().map(|high| !high)
        }
    }

    #[test]
    fn test_read_assembles_code_bit0_first() {
        let pins = [true, false, true].map(|l| Some(FakeInput::Level(l)));
        let mut sensor = GpioPhotoSensor::new(pins).unwrap();
        assert_eq!(sensor.bit_count(), 3);
        assert_eq!(sensor.read(), 0b101);
    }

    #[test]
    fn test_stops_at_first_unassigned_pin() {
        let pins = vec![
            Some(FakeInput::Level(true)),
            Some(FakeInput::Level(true)),
            None,
            Some(FakeInput::Level(true)),
        ];
        let mut sensor = GpioPhotoSensor::new(pins).unwrap();
        assert_eq!(sensor.bit_count(), 2);
        assert_eq!(sensor.read(), 0b11);
    }

    #[test]
    fn test_too_many_pins_rejected() {
        let pins = (0..7).map(|_| Some(FakeInput::Level(false)));
        assert!(matches!(
            GpioPhotoSensor::new(pins),
            Err(MotorError::ConfigError(_))
        ));
    }

    #[test]
    fn test_read_error_counts_as_low() {
        let pins = vec![Some(FakeInput::Level(true)), Some(FakeInput::Broken)];
        let mut sensor = GpioPhotoSensor::new(pins).unwrap();
        assert_eq!(sensor.read(), 0b01);
        assert_eq!(sensor.read_errors(), 1);
    }
}
