//! Decoder and sensor drivers.
//!
//! - [`gpio`] - Shift-register decoders and photo sensors on real pins
//! - [`simulation`] - Software stand-ins for development and testing
//!
//! Drivers implement `PhaseDecoder` or `PhotoSensor` from
//! `dial_common::hal`; the scheduler is generic over them.

pub mod gpio;
pub mod simulation;
