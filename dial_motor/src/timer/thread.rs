//! Thread-backed periodic timer.
//!
//! Fires the callback from a dedicated thread using absolute deadlines
//! (`next += period`) so that sleep jitter does not accumulate. When a
//! callback returns after the following deadline has already passed, the
//! miss is counted, logged with rate limiting and the schedule is resynced
//! instead of firing a burst of catch-up ticks.
//!
//! The thread waits with `park_timeout`, and `disarm()` unparks it, so
//! shutdown never waits out a long period.

use super::PeriodicTimer;
use dial_common::hal::error::MotorError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Log a summary every this many fires.
const SUMMARY_INTERVAL: u64 = 10_000;

/// Lock-free timing counters updated by the timer thread.
#[derive(Debug, Default)]
struct TimerStats {
    fires: AtomicU64,
    deadline_misses: AtomicU64,
    max_latency_ns: AtomicU64,
    max_callback_ns: AtomicU64,
}

/// Copy of the timer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerStatsSnapshot {
    /// Callbacks delivered
    pub fires: u64,
    /// Deadlines passed before the previous callback returned
    pub deadline_misses: u64,
    /// Worst wake-up latency behind the scheduled deadline [ns]
    pub max_latency_ns: u64,
    /// Worst callback duration [ns]
    pub max_callback_ns: u64,
}

impl TimerStats {
    fn record(&self, latency: Duration, callback: Duration) -> u64 {
        self.max_latency_ns
            .fetch_max(latency.as_nanos() as u64, Ordering::Relaxed);
        self.max_callback_ns
            .fetch_max(callback.as_nanos() as u64, Ordering::Relaxed);
        self.fires.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn snapshot(&self) -> TimerStatsSnapshot {
        TimerStatsSnapshot {
            fires: self.fires.load(Ordering::Relaxed),
            deadline_misses: self.deadline_misses.load(Ordering::Relaxed),
            max_latency_ns: self.max_latency_ns.load(Ordering::Relaxed),
            max_callback_ns: self.max_callback_ns.load(Ordering::Relaxed),
        }
    }
}

/// Periodic timer running its callback on a named thread.
pub struct ThreadTimer {
    name: String,
    running: Arc<AtomicBool>,
    stats: Arc<TimerStats>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadTimer {
    /// Create an unarmed timer whose thread will carry `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            running: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(TimerStats::default()),
            handle: None,
        }
    }

    /// Current timing counters.
    pub fn stats(&self) -> TimerStatsSnapshot {
        self.stats.snapshot()
    }
}

impl PeriodicTimer for ThreadTimer {
    fn arm<C>(
        &mut self,
        period: Duration,
        context: Arc<C>,
        callback: fn(&C),
    ) -> Result<(), MotorError>
    where
        C: Send + Sync + 'static,
    {
        if self.handle.is_some() {
            return Err(MotorError::TimerError(format!(
                "timer '{}' already armed",
                self.name
            )));
        }
        if period.is_zero() {
            return Err(MotorError::TimerError("period must be non-zero".to_string()));
        }

        if detect_rt_mode() {
            info!("Timer '{}' running with real-time scheduling", self.name);
        } else {
            info!("Timer '{}' running in standard (non-RT) mode", self.name);
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let stats = Arc::clone(&self.stats);
        let name = self.name.clone();

        let handle = std::thread::Builder::new()
            .name(self.name.clone())
            .spawn(move || {
                let mut next = Instant::now() + period;
                while running.load(Ordering::Acquire) {
                    // Woken early by disarm().
                    loop {
                        let now = Instant::now();
                        if now >= next || !running.load(Ordering::Acquire) {
                            break;
                        }
                        std::thread::park_timeout(next - now);
                    }
                    if !running.load(Ordering::Acquire) {
                        break;
                    }

                    let started = Instant::now();
                    callback(&context);
                    let fires =
                        stats.record(started.saturating_duration_since(next), started.elapsed());

                    next += period;
                    let after = Instant::now();
                    if after > next {
                        let misses = stats.deadline_misses.fetch_add(1, Ordering::Relaxed) + 1;
                        if misses <= 10 || misses % 1000 == 0 {
                            warn!(
                                "Timer '{}' deadline miss #{}: {}us behind (period {}us)",
                                name,
                                misses,
                                (after - next).as_micros(),
                                period.as_micros()
                            );
                        }
                        next = after + period;
                    }

                    if fires % SUMMARY_INTERVAL == 0 {
                        let snap = stats.snapshot();
                        debug!(
                            "Timer '{}': {} fires, max latency={}us, max callback={}us, misses={}",
                            name,
                            snap.fires,
                            snap.max_latency_ns / 1000,
                            snap.max_callback_ns / 1000,
                            snap.deadline_misses
                        );
                    }
                }
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                MotorError::TimerError(format!("failed to spawn timer thread: {}", e))
            })?;

        self.handle = Some(handle);
        debug!("Timer '{}' armed (period={}us)", self.name, period.as_micros());
        Ok(())
    }

    fn disarm(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                warn!("Timer '{}' thread panicked", self.name);
            }
            let snap = self.stats.snapshot();
            info!(
                "Timer '{}' disarmed after {} fires (misses: {})",
                self.name, snap.fires, snap.deadline_misses
            );
        }
    }

    fn is_armed(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Detect if running in real-time mode by checking scheduler policy.
fn detect_rt_mode() -> bool {
    #[cfg(target_os = "linux")]
    {
        use libc::{SCHED_FIFO, SCHED_RR, sched_getscheduler};
        unsafe {
            let policy = sched_getscheduler(0);
            policy == SCHED_FIFO || policy == SCHED_RR
        }
    }
    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}
