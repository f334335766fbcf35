//! Throughput ordering.
//!
//! Throughput (instructions per cycle) is the only key used to order
//! records. No other field participates, so records with equal throughput
//! compare equal even when their counters differ.

use core::cmp::Ordering;

use crate::sample::SampleRecord;

/// Order two records by throughput.
///
/// Zero-duration records have throughput 0. Throughput is always finite and
/// non-negative, so the comparison is total.
///
/// # Example
///
/// ```
/// use core::cmp::Ordering;
/// use roofline_core::{compare_throughput, SampleRecord};
///
/// let slow = SampleRecord::from_parts(0, 10, 100, 0, 0);
/// let fast = SampleRecord::from_parts(0, 10, 200, 0, 0);
/// assert_eq!(compare_throughput(&slow, &fast), Ordering::Less);
/// assert_eq!(compare_throughput(&fast, &fast), Ordering::Equal);
/// ```
#[inline]
pub fn compare_throughput(a: &SampleRecord, b: &SampleRecord) -> Ordering {
    a.throughput().total_cmp(&b.throughput())
}

/// Arithmetic mean of throughput across a batch.
///
/// Returns 0 for an empty batch.
pub fn mean_throughput(samples: &[SampleRecord]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(SampleRecord::throughput).sum();
    sum / samples.len() as f64
}
