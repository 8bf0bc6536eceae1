//! Simulation drivers.
//!
//! Software stand-ins for the decoder and sensor hardware, used by the
//! runner's simulation mode and by tests.

mod decoder;
mod sensor;

pub use decoder::{ApplyRecord, DecoderProbe, HISTORY_DEPTH, SimulationDecoder, energized_slot};
pub use sensor::{SensorInput, SimulatedPhotoSensor};
