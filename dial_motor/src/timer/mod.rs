//! Periodic timer facilities.
//!
//! The scheduler registers exactly one callback with a [`PeriodicTimer`].
//! The callback is a plain `fn(&C)` and receives its owner only through the
//! context handle given at registration; no global state is involved.
//!
//! - [`ThreadTimer`] - Dedicated thread with absolute-deadline pacing
//! - [`ManualTimer`] - Fired explicitly; deterministic tests and bench runs

mod manual;
mod thread;

pub use manual::ManualTimer;
pub use thread::{ThreadTimer, TimerStatsSnapshot};

use dial_common::hal::error::MotorError;
use std::sync::Arc;
use std::time::Duration;

/// Platform facility that fires one registered callback at a fixed period.
///
/// # Lifecycle
///
/// 1. `arm()` - Register the callback and its context; at most once at a time
/// 2. callback fires every `period` until disarmed
/// 3. `disarm()` - Deregister; returns only once no callback is in flight
///
/// After `disarm()` returns the timer has released its clone of the context.
pub trait PeriodicTimer: Send {
    /// Register `callback` to be invoked with `context` every `period`.
    ///
    /// # Errors
    /// `MotorError::TimerError` if the timer is already armed or cannot start.
    fn arm<C>(
        &mut self,
        period: Duration,
        context: Arc<C>,
        callback: fn(&C),
    ) -> Result<(), MotorError>
    where
        C: Send + Sync + 'static;

    /// Deregister the callback, waiting for an in-flight invocation to return.
    fn disarm(&mut self);

    /// Whether a callback is currently registered.
    fn is_armed(&self) -> bool;
}
