//! Hardware drivers over `embedded-hal` digital pins.
//!
//! - [`ShiftRegisterDecoder`] - One latched shift register per phase
//! - [`GpioPhotoSensor`] - Photo-interrupter inputs of one dial

mod photo_sensor;
mod shift_register;

pub use photo_sensor::GpioPhotoSensor;
pub use shift_register::ShiftRegisterDecoder;
