//! Simulated phase decoder.
//!
//! Each `SimulationDecoder` publishes what it drives through a
//! [`DecoderProbe`], which the foreground can clone and inspect while the
//! scheduler owns the decoder. The history is a fixed-capacity ring so the
//! tick path never allocates.

use dial_common::hal::decoder::PhaseDecoder;
use dial_common::hal::types::{MotorMask, PhaseIndex};
use parking_lot::Mutex;
use std::sync::Arc;

/// Number of `apply` calls kept per decoder.
pub const HISTORY_DEPTH: usize = 64;

/// One `apply` call as seen by a decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyRecord {
    /// Phase passed by the scheduler
    pub phase: PhaseIndex,
    /// Motors energized on this decoder's lines
    pub selection: MotorMask,
}

#[derive(Default)]
struct ProbeState {
    lines: MotorMask,
    applies: u64,
    history: heapless::Deque<ApplyRecord, HISTORY_DEPTH>,
}

/// Read-only view of a simulation decoder's output lines.
#[derive(Clone, Default)]
pub struct DecoderProbe {
    state: Arc<Mutex<ProbeState>>,
}

impl DecoderProbe {
    /// Motors currently energized on this decoder.
    pub fn lines(&self) -> MotorMask {
        self.state.lock().lines
    }

    /// Total `apply` calls received.
    pub fn applies(&self) -> u64 {
        self.state.lock().applies
    }

    /// Most recent `apply` calls, oldest first.
    pub fn history(&self) -> Vec<ApplyRecord> {
        self.state.lock().history.iter().copied().collect()
    }

    /// Forget recorded history (counters and lines are kept).
    pub fn clear_history(&self) {
        self.state.lock().history.clear();
    }
}

/// Decoder that drives no hardware and records its output.
pub struct SimulationDecoder {
    slot: usize,
    probe: DecoderProbe,
}

impl SimulationDecoder {
    /// Create a decoder for phase slot `slot` and its probe.
    pub fn new(slot: usize) -> (Self, DecoderProbe) {
        let probe = DecoderProbe::default();
        (
            Self {
                slot,
                probe: probe.clone(),
            },
            probe,
        )
    }

    /// Create `phase_count` decoders, slot `i` at index `i`, with their probes.
    pub fn bank(phase_count: usize) -> (Vec<Self>, Vec<DecoderProbe>) {
        (0..phase_count).map(Self::new).unzip()
    }

    /// Phase slot this decoder drives.
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl PhaseDecoder for SimulationDecoder {
    fn apply(&mut self, phase: PhaseIndex, selection: MotorMask) {
        let mut state = self.probe.state.lock();
        state.lines = selection;
        state.applies += 1;
        if state.history.is_full() {
            state.history.pop_front();
        }
        // Cannot fail: a slot was freed above.
        let _ = state.history.push_back(ApplyRecord { phase, selection });
    }
}

/// Decoder slot currently energizing `motor`, if exactly one does.
///
/// Returns `None` when the motor is de-energized. Two or more slots
/// energizing the same motor would be a wiring-level fault and also
/// yields `None`.
pub fn energized_slot(probes: &[DecoderProbe], motor: usize) -> Option<usize> {
    let mut found = None;
    for (slot, probe) in probes.iter().enumerate() {
        if probe.lines().selects(motor) {
            if found.is_some() {
                return None;
            }
            found = Some(slot);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_replaces_lines() {
        let (mut decoder, probe) = SimulationDecoder::new(2);
        assert_eq!(decoder.slot(), 2);

        decoder.apply(PhaseIndex::new(2, 4), MotorMask::MOTOR_1 | MotorMask::MOTOR_7);
        assert_eq!(probe.lines(), MotorMask::MOTOR_1 | MotorMask::MOTOR_7);

        decoder.apply(PhaseIndex::new(3, 4), MotorMask::empty());
        assert_eq!(probe.lines(), MotorMask::empty());
        assert_eq!(probe.applies(), 2);
    }

    #[test]
    fn test_history_is_bounded() {
        let (mut decoder, probe) = SimulationDecoder::new(0);
        for i in 0..(HISTORY_DEPTH + 10) {
            decoder.apply(PhaseIndex::new(i as u8, 4), MotorMask::empty());
        }
        let history = probe.history();
        assert_eq!(history.len(), HISTORY_DEPTH);
        // Oldest surviving record is call #10.
        assert_eq!(history[0].phase, PhaseIndex::new(10, 4));
        assert_eq!(probe.applies(), (HISTORY_DEPTH + 10) as u64);

        probe.clear_history();
        assert!(probe.history().is_empty());
    }

    #[test]
    fn test_energized_slot() {
        let (mut decoders, probes) = SimulationDecoder::bank(4);
        assert_eq!(energized_slot(&probes, 3), None);

        decoders[2].apply(PhaseIndex::new(2, 4), MotorMask::MOTOR_3);
        assert_eq!(energized_slot(&probes, 3), Some(2));
        assert_eq!(energized_slot(&probes, 4), None);

        decoders[0].apply(PhaseIndex::new(2, 4), MotorMask::MOTOR_3);
        assert_eq!(energized_slot(&probes, 3), None);
    }
}
