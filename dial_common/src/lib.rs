//! Dial Common Library
//!
//! This crate provides shared constants, hardware contracts and
//! configuration loading for the dial motor workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Hardware limits and defaults
//! - [`config`] - Configuration loading traits and types
//! - [`hal`] - Decoder/sensor contracts, motor types, errors, scheduler config
//! - [`dial`] - Dial geometry and Gray-code ring decoding
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use dial_common::prelude::*;
//!
//! let config = SchedulerConfig::for_mode(MotorMode::Nine, Direction::Forward);
//! assert!(config.validate().is_ok());
//! ```

pub mod config;
pub mod consts;
pub mod dial;
pub mod hal;
pub mod prelude;
