//! Photo sensor contract.
//!
//! The dial position is sensed by up to six photo interrupters reading
//! concentric code rings. The scheduler never reads sensors; the
//! application polls them to decide which motor to start or stop.

/// Instantaneous sample of the position sensors.
pub trait PhotoSensor: Send {
    /// Read all sensor bits, bit `i` = sensor `i`. Value is in `[0, 2^6)`.
    fn read(&mut self) -> u8;
}

impl<S: PhotoSensor + ?Sized> PhotoSensor for Box<S> {
    fn read(&mut self) -> u8 {
        (**self).read()
    }
}
