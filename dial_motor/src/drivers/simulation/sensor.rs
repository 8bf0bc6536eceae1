//! Simulated photo sensor.

use dial_common::consts::MAX_SENSOR_BITS;
use dial_common::hal::sensor::PhotoSensor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Handle used to inject the code seen by a [`SimulatedPhotoSensor`].
#[derive(Clone, Default)]
pub struct SensorInput {
    code: Arc<AtomicU8>,
}

impl SensorInput {
    /// Set the raw code under the sensors.
    pub fn set(&self, code: u8) {
        self.code.store(code, Ordering::Relaxed);
    }
}

/// Photo sensor whose reading is set from the foreground.
pub struct SimulatedPhotoSensor {
    code: Arc<AtomicU8>,
    mask: u8,
}

impl SimulatedPhotoSensor {
    /// Sensor with `bit_count` wired bits (clamped to `MAX_SENSOR_BITS`).
    pub fn new(bit_count: usize) -> (Self, SensorInput) {
        let input = SensorInput::default();
        let bits = bit_count.min(MAX_SENSOR_BITS);
        (
            Self {
                code: Arc::clone(&input.code),
                mask: ((1u16 << bits) - 1) as u8,
            },
            input,
        )
    }
}

impl PhotoSensor for SimulatedPhotoSensor {
    fn read(&mut self) -> u8 {
        self.code.load(Ordering::Relaxed) & self.mask
    }
}
