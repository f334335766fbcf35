//! Measurement infrastructure.
//!
//! This module provides:
//! - Raw cycle-counter reads with platform-specific implementations
//! - Counter frequency detection
//! - The [`ClockContext`] that converts cycle deltas to time

mod clock;
mod timer;

pub use clock::{ClockContext, CPU_FREQ_ENV};
pub use timer::{counter_frequency_hz, read_counter};
