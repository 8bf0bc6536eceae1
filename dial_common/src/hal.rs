//! Hardware contracts and scheduler types.
//!
//! This module contains the traits the scheduler drives (`PhaseDecoder`)
//! or that the application polls (`PhotoSensor`), together with the
//! configuration and error types of the motor bank.

pub mod config;
pub mod decoder;
pub mod error;
pub mod sensor;
pub mod types;
