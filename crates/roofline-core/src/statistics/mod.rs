//! Statistical reduction of measurement batches.
//!
//! This module provides:
//! - Throughput ordering of records, with zero-duration records treated as
//!   throughput 0
//! - Single-pass sample standard deviation using Welford's algorithm
//! - Representative selection strategies (minimum, maximum, median)

mod online_stats;
mod select;
mod throughput;

pub use online_stats::{throughput_std_dev, ThroughputStats};
pub use select::{select_max, select_median, select_min, Statistic, UnknownStatistic};
pub use throughput::{compare_throughput, mean_throughput};
