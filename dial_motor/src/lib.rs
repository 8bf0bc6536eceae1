//! # Dial Motor Library
//!
//! Timer-driven phase scheduler for a bank of multiplexed stepper motors.
//!
//! A small set of phase decoders is shared by all motors. Every timer tick
//! advances one global phase counter; the decoder of that phase drives the
//! motors flagged running, every other decoder is driven empty.
//!
//! # Module Structure
//!
//! - [`scheduler`] - `MotorStepScheduler`, the tick handler and its stats
//! - [`enable_table`] - Per-motor run flags shared with the tick
//! - [`timer`] - `PeriodicTimer` trait, thread-backed and manual timers
//! - [`drivers`] - Decoder and sensor implementations
//! - [`runner`] - Configuration and assembly for the `dial_motor` binary
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       dial_motor (single crate)                  │
//! │  ┌──────────────┐    ┌───────────────────┐    ┌───────────────┐  │
//! │  │ start()/stop │───►│ MotorEnableTable  │───►│  tick (timer  │  │
//! │  │ (foreground) │    │   (AtomicBool×N)  │    │   context)    │  │
//! │  └──────────────┘    └───────────────────┘    └───────┬───────┘  │
//! │                                                       │          │
//! │                                                       ▼          │
//! │                                          ┌────────────────────┐  │
//! │                                          │ PhaseDecoder[0..P] │  │
//! │                                          │  (trait, generic)  │  │
//! │                                          └────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod drivers;
pub mod enable_table;
pub mod runner;
pub mod scheduler;
pub mod timer;

// Re-export key types for convenience
pub use crate::enable_table::MotorEnableTable;
pub use crate::runner::{RunnerConfig, SimulationRig};
pub use crate::scheduler::{MotorStepScheduler, TickStatsSnapshot};
pub use crate::timer::{ManualTimer, PeriodicTimer, ThreadTimer};
