//! Explicitly fired timer.
//!
//! Cloning a `ManualTimer` yields another handle to the same registration, so
//! a test can hand one clone to the scheduler and keep another to fire ticks.

use super::PeriodicTimer;
use dial_common::hal::error::MotorError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

type ArmedCallback = Box<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registration {
    callback: Option<ArmedCallback>,
    period: Option<Duration>,
    fired: u64,
}

/// Timer whose ticks are produced by calling [`fire`](ManualTimer::fire).
#[derive(Clone, Default)]
pub struct ManualTimer {
    slot: Arc<Mutex<Registration>>,
}

impl ManualTimer {
    /// Create an unarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke the registered callback once. Returns `false` when disarmed.
    ///
    /// The registration lock is held for the duration of the callback, so a
    /// concurrent `disarm()` waits for it to finish.
    pub fn fire(&self) -> bool {
        let mut guard = self.slot.lock();
        let slot = &mut *guard;
        match slot.callback.as_ref() {
            Some(callback) => {
                callback();
                slot.fired += 1;
                true
            }
            None => false,
        }
    }

    /// Fire `n` times, returning how many ticks were delivered.
    pub fn fire_n(&self, n: usize) -> usize {
        (0..n).take_while(|_| self.fire()).count()
    }

    /// Ticks delivered since creation.
    pub fn fired(&self) -> u64 {
        self.slot.lock().fired
    }

    /// Period requested by the current registration.
    pub fn period(&self) -> Option<Duration> {
        self.slot.lock().period
    }
}

impl PeriodicTimer for ManualTimer {
    fn arm<C>(
        &mut self,
        period: Duration,
        context: Arc<C>,
        callback: fn(&C),
    ) -> Result<(), MotorError>
    where
        C: Send + Sync + 'static,
    {
        let mut slot = self.slot.lock();
        if slot.callback.is_some() {
            return Err(MotorError::TimerError("timer already armed".to_string()));
        }
        slot.callback = Some(Box::new(move || callback(&context)));
        slot.period = Some(period);
        Ok(())
    }

    fn disarm(&mut self) {
        let mut slot = self.slot.lock();
        slot.callback = None;
        slot.period = None;
    }

    fn is_armed(&self) -> bool {
        self.slot.lock().callback.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn bump(counter: &AtomicU32) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[test]
    fn test_fire_invokes_callback_with_context() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut timer = ManualTimer::new();
        let handle = timer.clone();

        timer
            .arm(Duration::from_millis(2), Arc::clone(&counter), bump)
            .unwrap();
        assert!(handle.is_armed());
        assert_eq!(handle.period(), Some(Duration::from_millis(2)));

        assert_eq!(handle.fire_n(3), 3);
        assert_eq!(counter.load(Ordering::Relaxed), 3);
        assert_eq!(handle.fired(), 3);
    }

    #[test]
    fn test_disarm_releases_context() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut timer = ManualTimer::new();
        timer
            .arm(Duration::from_millis(1), Arc::clone(&counter), bump)
            .unwrap();
        assert_eq!(Arc::strong_count(&counter), 2);

        timer.disarm();
        assert!(!timer.is_armed());
        assert!(!timer.fire());
        assert_eq!(timer.fire_n(5), 0);
        assert_eq!(Arc::strong_count(&counter), 1);
    }

    #[test]
    fn test_double_arm_rejected() {
        let counter = Arc::new(AtomicU32::new(0));
        let mut timer = ManualTimer::new();
        timer
            .arm(Duration::from_millis(1), Arc::clone(&counter), bump)
            .unwrap();
        let err = timer
            .arm(Duration::from_millis(1), Arc::clone(&counter), bump)
            .unwrap_err();
        assert!(matches!(err, MotorError::TimerError(_)));
    }
}
