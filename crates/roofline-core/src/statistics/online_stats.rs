//! Online (streaming) throughput dispersion using Welford's algorithm.
//!
//! Computes the sample standard deviation of throughput with O(1) memory,
//! so it works on a stored batch or on records as they are produced.

use crate::math;
use crate::sample::SampleRecord;

/// Online throughput statistics accumulator using Welford's algorithm.
///
/// # Example
///
/// ```
/// use roofline_core::{SampleRecord, ThroughputStats};
///
/// let mut stats = ThroughputStats::new();
/// for instructions in [100, 200, 150] {
///     stats.push(&SampleRecord::from_parts(0, 10, instructions, 0, 0));
/// }
/// assert!((stats.mean() - 15.0).abs() < 1e-12);
/// assert!((stats.std_dev() - 5.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThroughputStats {
    /// Number of records seen.
    count: usize,
    /// Running mean of throughput.
    mean: f64,
    /// Welford's M2: sum of squared deviations from the current mean.
    m2: f64,
}

impl ThroughputStats {
    /// Create an empty accumulator.
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Add one record's throughput.
    pub fn push(&mut self, record: &SampleRecord) {
        self.update(record.throughput());
    }

    /// Add one raw throughput value.
    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    /// Number of values seen.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Running mean (0 when empty).
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance with an `n - 1` denominator, or 0 if fewer than two values.
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation, or 0 if fewer than two values.
    pub fn std_dev(&self) -> f64 {
        math::sqrt(self.variance())
    }
}

impl<'a> Extend<&'a SampleRecord> for ThroughputStats {
    fn extend<I: IntoIterator<Item = &'a SampleRecord>>(&mut self, iter: I) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Sample standard deviation of throughput across a batch.
///
/// Returns 0 when the batch holds fewer than two records.
pub fn throughput_std_dev(samples: &[SampleRecord]) -> f64 {
    let mut stats = ThroughputStats::new();
    stats.extend(samples);
    stats.std_dev()
}
