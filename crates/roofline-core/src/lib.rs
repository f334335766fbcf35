//! Core statistics for roofline throughput sampling.
//!
//! This crate holds the measurement record and the numerics that reduce a
//! batch of noisy records to one representative measurement, designed to
//! work in `no_std` environments with only an allocator.
//!
//! # Features
//!
//! - `std` (default): Enable `std::error::Error` impls
//!
//! # Usage
//!
//! This crate is typically used through the main `roofline` crate, which
//! provides the clock context, calibration and the repeated sampler.
//! It can be used directly to reduce records produced elsewhere:
//!
//! ```
//! use roofline_core::{SampleRecord, Statistic, throughput_std_dev};
//!
//! let mut batch = [
//!     SampleRecord::from_parts(0, 10, 100, 0, 0),
//!     SampleRecord::from_parts(0, 10, 200, 0, 0),
//!     SampleRecord::from_parts(0, 10, 150, 0, 0),
//! ];
//! let sd = throughput_std_dev(&batch);
//! let idx = Statistic::Median.select(&mut batch);
//! assert_eq!(batch[idx].instructions, 150);
//! assert!((sd - 5.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod constants;
pub mod math;
pub mod sample;
pub mod statistics;

// Re-export commonly used items at crate root
pub use sample::{SampleInput, SampleRecord};
pub use statistics::{
    compare_throughput, mean_throughput, throughput_std_dev, Statistic, ThroughputStats,
    UnknownStatistic,
};
