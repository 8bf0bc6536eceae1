//! Motor step scheduler and its tick handler.
//!
//! The `MotorStepScheduler` owns the decoders and the periodic timer. Every
//! tick advances one global phase counter and drives all decoders: the
//! decoder of the new phase receives the set of running motors, every other
//! decoder receives the empty set. Because every decoder is rewritten on
//! every tick, a stopped motor's lines are released on the first tick after
//! `stop()` and never re-asserted while it stays stopped.
//!
//! ```text
//!  start()/stop() ──► MotorEnableTable ──► tick ──► PhaseDecoder[0..P]
//!   (foreground)        (atomics)       (timer ctx)   (apply, replace)
//! ```
//!
//! The phase counter is shared: a motor started at any moment joins the
//! sequence wherever the counter currently is. Each motor still sees a
//! strictly ordered phase sequence with no skips or repeats while it runs.

use crate::enable_table::MotorEnableTable;
use crate::timer::PeriodicTimer;
use dial_common::consts::MAX_PHASES;
use dial_common::hal::config::SchedulerConfig;
use dial_common::hal::decoder::PhaseDecoder;
use dial_common::hal::error::MotorError;
use dial_common::hal::types::{Direction, MotorMask, PhaseIndex};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Tick handler counters, updated without locks from the timer context.
#[derive(Debug, Default)]
struct TickStats {
    ticks: AtomicU64,
    overlapped_ticks: AtomicU64,
    max_tick_ns: AtomicU64,
    total_tick_ns: AtomicU64,
}

impl TickStats {
    #[inline]
    fn record(&self, elapsed: Duration) {
        let ns = elapsed.as_nanos() as u64;
        self.ticks.fetch_add(1, Ordering::Relaxed);
        self.total_tick_ns.fetch_add(ns, Ordering::Relaxed);
        self.max_tick_ns.fetch_max(ns, Ordering::Relaxed);
    }
}

/// Copy of the tick handler counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStatsSnapshot {
    /// Completed ticks
    pub ticks: u64,
    /// Ticks dropped because the previous tick was still running
    pub overlapped_ticks: u64,
    /// Worst-case tick handler duration [ns]
    pub max_tick_ns: u64,
    /// Average tick handler duration [ns]
    pub avg_tick_ns: u64,
}

/// State touched only from inside the tick handler.
struct PhaseOutput<D> {
    phase: PhaseIndex,
    decoders: heapless::Vec<D, MAX_PHASES>,
}

/// Context shared with the timer callback.
struct StepCore<D> {
    table: MotorEnableTable,
    output: Mutex<PhaseOutput<D>>,
    /// Mirror of `output.phase` readable without the lock.
    phase: AtomicU8,
    direction: Direction,
    phase_count: u8,
    stats: TickStats,
}

impl<D: PhaseDecoder> StepCore<D> {
    /// Timer callback: one phase transition across all running motors.
    ///
    /// Never blocks: if a previous tick still holds the output, this tick is
    /// dropped and counted.
    fn tick(&self) {
        let Some(mut output) = self.output.try_lock() else {
            self.stats.overlapped_ticks.fetch_add(1, Ordering::Relaxed);
            return;
        };
        let started = Instant::now();

        let phase = output.phase.step(self.direction, self.phase_count);
        output.phase = phase;
        let running = self.table.running_mask();

        for (slot, decoder) in output.decoders.iter_mut().enumerate() {
            let selection = if slot == phase.as_usize() {
                running
            } else {
                MotorMask::empty()
            };
            decoder.apply(phase, selection);
        }

        self.phase.store(phase.get(), Ordering::Release);
        drop(output);
        self.stats.record(started.elapsed());
    }

    fn release_all(&self) {
        let mut output = self.output.lock();
        let phase = output.phase;
        for decoder in output.decoders.iter_mut() {
            decoder.apply(phase, MotorMask::empty());
        }
    }
}

/// Timer-driven phase scheduler for a bank of multiplexed stepper motors.
///
/// # Lifecycle
///
/// 1. `new()` - validate, bind decoders, arm the timer
/// 2. `start()` / `stop()` - from any foreground context
/// 3. drop - disarm the timer, then de-energize every decoder
pub struct MotorStepScheduler<D, T>
where
    D: PhaseDecoder + 'static,
    T: PeriodicTimer,
{
    core: Arc<StepCore<D>>,
    timer: T,
    config: SchedulerConfig,
}

impl<D, T> MotorStepScheduler<D, T>
where
    D: PhaseDecoder + 'static,
    T: PeriodicTimer,
{
    /// Create the scheduler and arm its timer.
    ///
    /// `decoders` must yield exactly `config.phase_count` decoders, decoder
    /// `i` driving phase `i`.
    ///
    /// # Errors
    /// - `MotorError::ConfigError` if the configuration exceeds hardware
    ///   limits or the decoder count does not match `phase_count`
    /// - `MotorError::TimerError` if the timer cannot be armed
    pub fn new<I>(config: SchedulerConfig, decoders: I, mut timer: T) -> Result<Self, MotorError>
    where
        I: IntoIterator<Item = D>,
    {
        config.validate()?;

        let mut bound = heapless::Vec::<D, MAX_PHASES>::new();
        for decoder in decoders {
            if bound.push(decoder).is_err() {
                return Err(MotorError::ConfigError(format!(
                    "more than {} decoders supplied",
                    MAX_PHASES
                )));
            }
        }
        if bound.len() != config.phase_count as usize {
            return Err(MotorError::ConfigError(format!(
                "expected {} decoders (one per phase), got {}",
                config.phase_count,
                bound.len()
            )));
        }

        let table = MotorEnableTable::new(config.motor_count as usize)?;
        let core = Arc::new(StepCore {
            table,
            output: Mutex::new(PhaseOutput {
                phase: PhaseIndex::ZERO,
                decoders: bound,
            }),
            phase: AtomicU8::new(0),
            direction: config.direction,
            phase_count: config.phase_count,
            stats: TickStats::default(),
        });

        timer.arm(config.tick_interval(), Arc::clone(&core), StepCore::<D>::tick)?;

        info!(
            "MotorStepScheduler created: {} motors, {} phases, {:?}, tick={}us",
            config.motor_count, config.phase_count, config.direction, config.tick_interval_us
        );

        Ok(Self {
            core,
            timer,
            config,
        })
    }

    /// Mark `motor` as running. Driven from the next tick on. Idempotent.
    ///
    /// # Errors
    /// `MotorError::RangeError` if `motor >= motor_count`.
    pub fn start(&self, motor: usize) -> Result<(), MotorError> {
        self.core
            .table
            .set(motor, true)
            .inspect_err(|e| warn!("start rejected: {}", e))?;
        debug!(motor, "motor started");
        Ok(())
    }

    /// Mark `motor` as stopped. Its lines are released on the next tick.
    /// Idempotent.
    ///
    /// # Errors
    /// `MotorError::RangeError` if `motor >= motor_count`.
    pub fn stop(&self, motor: usize) -> Result<(), MotorError> {
        self.core
            .table
            .set(motor, false)
            .inspect_err(|e| warn!("stop rejected: {}", e))?;
        debug!(motor, "motor stopped");
        Ok(())
    }

    /// Stop every motor, one entry at a time.
    pub fn stop_all(&self) {
        for motor in 0..self.core.table.motor_count() {
            // In range by construction.
            let _ = self.core.table.set(motor, false);
        }
        debug!("all motors stopped");
    }

    /// Whether `motor` is flagged running.
    ///
    /// # Errors
    /// `MotorError::RangeError` if `motor >= motor_count`.
    pub fn is_running(&self, motor: usize) -> Result<bool, MotorError> {
        self.core.table.is_enabled(motor)
    }

    /// Motors currently flagged running.
    pub fn running_mask(&self) -> MotorMask {
        self.core.table.running_mask()
    }

    /// Phase driven by the most recent tick.
    pub fn phase(&self) -> PhaseIndex {
        PhaseIndex::new(
            self.core.phase.load(Ordering::Acquire),
            self.core.phase_count,
        )
    }

    /// Number of motors addressed by this scheduler.
    pub fn motor_count(&self) -> usize {
        self.core.table.motor_count()
    }

    /// Configuration the scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The timer driving this scheduler.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Tick handler counters.
    pub fn stats(&self) -> TickStatsSnapshot {
        let stats = &self.core.stats;
        let ticks = stats.ticks.load(Ordering::Relaxed);
        let total = stats.total_tick_ns.load(Ordering::Relaxed);
        TickStatsSnapshot {
            ticks,
            overlapped_ticks: stats.overlapped_ticks.load(Ordering::Relaxed),
            max_tick_ns: stats.max_tick_ns.load(Ordering::Relaxed),
            avg_tick_ns: if ticks > 0 { total / ticks } else { 0 },
        }
    }
}

impl<D, T> Drop for MotorStepScheduler<D, T>
where
    D: PhaseDecoder + 'static,
    T: PeriodicTimer,
{
    fn drop(&mut self) {
        // No tick may run past this point.
        self.timer.disarm();
        self.core.release_all();

        let stats = self.stats();
        info!(
            "MotorStepScheduler shut down after {} ticks (overlapped: {}, max={}ns)",
            stats.ticks, stats.overlapped_ticks, stats.max_tick_ns
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualTimer;

    /// Decoder that keeps only its last selection.
    #[derive(Clone, Default)]
    struct Latch {
        lines: Arc<Mutex<MotorMask>>,
    }

    impl PhaseDecoder for Latch {
        fn apply(&mut self, _phase: PhaseIndex, selection: MotorMask) {
            *self.lines.lock() = selection;
        }
    }

    fn latches(n: usize) -> Vec<Latch> {
        (0..n).map(|_| Latch::default()).collect()
    }

    #[test]
    fn test_construct_arms_timer() {
        let timer = ManualTimer::new();
        let scheduler =
            MotorStepScheduler::new(SchedulerConfig::default(), latches(4), timer.clone())
                .unwrap();
        assert!(timer.is_armed());
        assert_eq!(timer.period(), Some(Duration::from_micros(2000)));
        assert_eq!(scheduler.phase(), PhaseIndex::ZERO);
        assert_eq!(scheduler.running_mask(), MotorMask::empty());
        assert_eq!(scheduler.motor_count(), 9);
    }

    #[test]
    fn test_decoder_count_must_match_phases() {
        let timer = ManualTimer::new();
        let result =
            MotorStepScheduler::new(SchedulerConfig::default(), latches(3), timer.clone());
        assert!(matches!(result, Err(MotorError::ConfigError(_))));
        assert!(!timer.is_armed());

        let result =
            MotorStepScheduler::new(SchedulerConfig::default(), latches(5), timer.clone());
        assert!(matches!(result, Err(MotorError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_config_never_arms() {
        let timer = ManualTimer::new();
        let config = SchedulerConfig {
            motor_count: 10,
            ..SchedulerConfig::default()
        };
        let result = MotorStepScheduler::new(config, latches(4), timer.clone());
        assert!(matches!(result, Err(MotorError::ConfigError(_))));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_tick_drives_only_current_phase_decoder() {
        let timer = ManualTimer::new();
        let decoders = latches(4);
        let scheduler =
            MotorStepScheduler::new(SchedulerConfig::default(), decoders.clone(), timer.clone())
                .unwrap();
        scheduler.start(1).unwrap();

        timer.fire();
        assert_eq!(scheduler.phase().get(), 1);
        assert_eq!(*decoders[1].lines.lock(), MotorMask::MOTOR_1);
        for idle in [0, 2, 3] {
            assert_eq!(*decoders[idle].lines.lock(), MotorMask::empty());
        }

        timer.fire();
        assert_eq!(*decoders[1].lines.lock(), MotorMask::empty());
        assert_eq!(*decoders[2].lines.lock(), MotorMask::MOTOR_1);
    }

    #[test]
    fn test_overlapping_tick_is_dropped() {
        let timer = ManualTimer::new();
        let scheduler =
            MotorStepScheduler::new(SchedulerConfig::default(), latches(4), timer.clone())
                .unwrap();

        {
            let _held = scheduler.core.output.lock();
            scheduler.core.tick();
        }
        assert_eq!(scheduler.phase(), PhaseIndex::ZERO);
        let stats = scheduler.stats();
        assert_eq!(stats.overlapped_ticks, 1);
        assert_eq!(stats.ticks, 0);

        timer.fire();
        assert_eq!(scheduler.stats().ticks, 1);
    }

    #[test]
    fn test_drop_disarms_then_releases_lines() {
        let timer = ManualTimer::new();
        let decoders = latches(4);
        let scheduler =
            MotorStepScheduler::new(SchedulerConfig::default(), decoders.clone(), timer.clone())
                .unwrap();
        scheduler.start(0).unwrap();
        timer.fire();
        assert_eq!(*decoders[1].lines.lock(), MotorMask::MOTOR_0);

        drop(scheduler);
        assert!(!timer.is_armed());
        assert!(!timer.fire());
        for decoder in &decoders {
            assert_eq!(*decoder.lines.lock(), MotorMask::empty());
        }
    }
}
