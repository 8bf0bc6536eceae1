//! Dial geometry and code-ring decoding.
//!
//! Each dial carries a printed encoder disk with one concentric ring per
//! sensor bit. Sector `n` (counted from 1 at the dial's start angle) is
//! marked with the reflected binary Gray code of `n`, innermost ring = bit 0,
//! so adjacent sectors differ in exactly one sensor. Code 0 means no sector
//! is under the sensors (dial at rest).

/// Reflected binary Gray code of `n`.
#[inline]
pub const fn gray_encode(n: u8) -> u8 {
    n ^ (n >> 1)
}

/// Inverse of [`gray_encode`].
#[inline]
pub const fn gray_decode(code: u8) -> u8 {
    let mut n = code;
    let mut shift = code >> 1;
    while shift != 0 {
        n ^= shift;
        shift >>= 1;
    }
    n
}

/// Static description of one dial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialSpec {
    /// Dial label as printed on the keymap.
    pub name: char,
    /// Number of finger holes (keys).
    pub keys: u8,
    /// Number of sensor rings read for this dial.
    pub sensor_bits: u8,
    /// Whether a dead sector precedes the first key.
    pub leading_play: bool,
}

impl DialSpec {
    /// Number of coded sectors on the disk.
    pub const fn sector_count(&self) -> u8 {
        self.keys + self.leading_play as u8
    }

    /// Mask of the sensor bits this dial uses.
    pub const fn code_mask(&self) -> u8 {
        ((1u16 << self.sensor_bits) - 1) as u8
    }

    /// Sector under the sensors for a raw reading, `None` at rest or for
    /// codes past the last sector.
    pub fn sector(&self, raw: u8) -> Option<u8> {
        let n = gray_decode(raw & self.code_mask());
        (n != 0 && n <= self.sector_count()).then_some(n)
    }

    /// Zero-based key index under the sensors, skipping the dead sector.
    pub fn key(&self, raw: u8) -> Option<u8> {
        let sector = self.sector(raw)?;
        let first_key_sector = 1 + self.leading_play as u8;
        sector.checked_sub(first_key_sector)
    }
}

/// The nine dials of the full keyboard, indexed by motor id.
pub const DIALS: [DialSpec; 9] = [
    DialSpec { name: 'a', keys: 35, sensor_bits: 6, leading_play: true },
    DialSpec { name: 'b', keys: 3, sensor_bits: 2, leading_play: false },
    DialSpec { name: 'c', keys: 4, sensor_bits: 3, leading_play: false },
    DialSpec { name: 'd', keys: 1, sensor_bits: 3, leading_play: true },
    DialSpec { name: 'e', keys: 6, sensor_bits: 3, leading_play: true },
    DialSpec { name: 'f', keys: 4, sensor_bits: 3, leading_play: true },
    DialSpec { name: 'g', keys: 3, sensor_bits: 2, leading_play: false },
    DialSpec { name: 'h', keys: 3, sensor_bits: 2, leading_play: false },
    DialSpec { name: 'i', keys: 10, sensor_bits: 4, leading_play: true },
];

/// Look up a dial by its printed label.
pub fn dial_by_name(name: char) -> Option<&'static DialSpec> {
    DIALS.iter().find(|d| d.name == name)
}
