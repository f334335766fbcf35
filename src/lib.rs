//! # roofline
//!
//! Adaptive statistical sampling for roofline throughput measurements.
//!
//! This crate turns a short synthetic kernel into a trustworthy throughput
//! number:
//! - Calibrates how many repetitions make one kernel run long enough to
//!   measure with a cycle counter
//! - Repeats the run a fixed number of times to average out timer and OS noise
//! - Reduces the batch to a representative record (min, max or median
//!   throughput) plus the sample standard deviation of throughput
//!
//! Which kernel to run, where to pin it and how to print the results are
//! left to the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! use roofline::{ClockContext, Config, LoadKernel, SampleInput, Sampler, Statistic};
//!
//! let sampler = Sampler::new(
//!     Config::default().statistic(Statistic::Max),
//!     ClockContext::detect(),
//! );
//!
//! let mut stream = vec![0.0f64; 1 << 20];
//! let mut input = SampleInput::new(&mut stream);
//! let result = sampler.measure(&mut LoadKernel, &mut input)?;
//!
//! println!(
//!     "{:.3} instructions/cycle (sd {:.3}) at loop_repeat={}",
//!     result.sample.throughput(),
//!     result.std_dev,
//!     result.loop_repeat,
//! );
//! # Ok::<(), roofline::SamplingError>(())
//! ```
//!
//! ## Custom Kernels
//!
//! Anything implementing [`Kernel`] can be sampled, including closures with
//! explicitly typed arguments. A kernel must stamp `ts_start`/`ts_end` with
//! [`read_counter`] (or any counter matching the [`ClockContext`]) and fill in
//! its work counters.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod error;

// Functional modules
pub mod calibration;
pub mod kernel;
pub mod measurement;
pub mod sampler;

// Re-exports for public API
pub use calibration::{autoset_loop_repeat, Calibration, CalibrationLimits};
pub use config::{
    AllocationPolicy, Config, DEFAULT_CALIBRATION_BUDGET, MIN_DURATION_ENV, MIN_LOOP_REPEAT_ENV,
    REPEAT_ENV, STATISTIC_ENV,
};
pub use error::{ConfigError, SamplingError, SamplingResult};
pub use kernel::{FlopKernel, Kernel, LoadKernel, StoreKernel};
pub use measurement::{counter_frequency_hz, read_counter, ClockContext, CPU_FREQ_ENV};
pub use sampler::{repeat_bench, BenchResult, Sampler};

// Re-export the statistics core
pub use roofline_core::constants::{
    DEFAULT_MIN_DURATION_MS, DEFAULT_MIN_LOOP_REPEAT, DEFAULT_REPEAT,
};
pub use roofline_core::{
    compare_throughput, mean_throughput, throughput_std_dev, SampleInput, SampleRecord, Statistic,
    ThroughputStats, UnknownStatistic,
};
