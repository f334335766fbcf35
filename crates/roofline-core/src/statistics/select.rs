//! Representative selection strategies.
//!
//! Each strategy returns an index into the batch so the caller can pull out
//! the winning record and, separately, compute the dispersion of the whole
//! batch. All strategies order records with [`compare_throughput`] only.
//!
//! Selection on an empty batch returns index 0; callers must not index an
//! empty batch with it.

use alloc::string::{String, ToString};
use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use super::throughput::compare_throughput;
use crate::sample::SampleRecord;

/// Strategy used to pick the representative record of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    /// Lowest throughput.
    Min,
    /// Highest throughput.
    Max,
    /// Upper median throughput. Sorts the batch in place.
    #[default]
    Median,
}

impl Statistic {
    /// All strategies, in declaration order.
    pub const ALL: [Statistic; 3] = [Statistic::Min, Statistic::Max, Statistic::Median];

    /// Pick the representative index of `samples`.
    ///
    /// `Median` reorders `samples`; the returned index refers to the
    /// reordered slice.
    pub fn select(&self, samples: &mut [SampleRecord]) -> usize {
        match self {
            Statistic::Min => select_min(samples),
            Statistic::Max => select_max(samples),
            Statistic::Median => select_median(samples),
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Median => "median",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown statistic name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatistic(pub String);

impl fmt::Display for UnknownStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown statistic '{}' (expected one of: min, max, median)",
            self.0
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownStatistic {}

impl FromStr for Statistic {
    type Err = UnknownStatistic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimum" => Ok(Statistic::Min),
            "max" | "maximum" => Ok(Statistic::Max),
            "median" | "med" => Ok(Statistic::Median),
            _ => Err(UnknownStatistic(s.to_string())),
        }
    }
}

/// Sort ascending by throughput and return `n / 2`.
///
/// For even `n` this is the upper-middle element; there is no interpolation.
/// The sort is stable, so records with equal throughput keep their order.
pub fn select_median(samples: &mut [SampleRecord]) -> usize {
    samples.sort_by(compare_throughput);
    samples.len() / 2
}

/// Index of the highest-throughput record.
///
/// The scan starts from the last record and walks backwards, replacing the
/// current best only on a strict improvement, so ties resolve to the highest
/// index.
pub fn select_max(samples: &[SampleRecord]) -> usize {
    select_extreme(samples, Ordering::Less)
}

/// Index of the lowest-throughput record.
///
/// Mirror of [`select_max`]; ties resolve to the highest index.
pub fn select_min(samples: &[SampleRecord]) -> usize {
    select_extreme(samples, Ordering::Greater)
}

/// Walk backwards from the last record, moving to a candidate whenever the
/// current best compares as `replace_when` against it.
fn select_extreme(samples: &[SampleRecord], replace_when: Ordering) -> usize {
    let Some(last) = samples.len().checked_sub(1) else {
        return 0;
    };
    let mut best = last;
    for idx in (0..last).rev() {
        if compare_throughput(&samples[best], &samples[idx]) == replace_when {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn rec(instructions: u64, cycles: u64) -> SampleRecord {
        SampleRecord::from_parts(0, cycles, instructions, 0, 0)
    }

    #[test]
    fn test_median_odd_batch() {
        let mut batch = [rec(100, 10), rec(200, 10), rec(150, 10)];
        let idx = select_median(&mut batch);
        assert_eq!(idx, 1);
        assert_eq!(batch[idx].instructions, 150);
        assert_eq!(batch[idx].throughput(), 15.0);
    }

    #[test]
    fn test_median_even_batch_takes_upper_middle() {
        let mut batch = [rec(40, 10), rec(10, 10), rec(30, 10), rec(20, 10)];
        let idx = select_median(&mut batch);
        assert_eq!(idx, 2);
        assert_eq!(batch[idx].instructions, 30);
    }

    #[test]
    fn test_median_single() {
        let mut batch = [rec(7, 1)];
        assert_eq!(select_median(&mut batch), 0);
    }

    #[test]
    fn test_max_and_min() {
        let batch = [rec(30, 10), rec(90, 10), rec(10, 10), rec(50, 10)];
        assert_eq!(select_max(&batch), 1);
        assert_eq!(select_min(&batch), 2);
    }

    #[test]
    fn test_extreme_at_last_index() {
        let batch = [rec(30, 10), rec(20, 10), rec(90, 10)];
        assert_eq!(select_max(&batch), 2);
        let batch = [rec(30, 10), rec(20, 10), rec(1, 10)];
        assert_eq!(select_min(&batch), 2);
    }

    #[test]
    fn test_ties_keep_highest_index() {
        let batch = [rec(50, 10), rec(50, 10), rec(10, 10), rec(10, 10)];
        assert_eq!(select_max(&batch), 1);
        assert_eq!(select_min(&batch), 3);
    }

    #[test]
    fn test_zero_duration_is_lowest() {
        let batch = [rec(10, 10), rec(1_000_000, 0), rec(20, 10)];
        assert_eq!(select_min(&batch), 1);
        assert_eq!(select_max(&batch), 2);
    }

    #[test]
    fn test_empty_batch_returns_zero() {
        assert_eq!(select_max(&[]), 0);
        assert_eq!(select_min(&[]), 0);
        assert_eq!(select_median(&mut []), 0);
    }

    #[test]
    fn test_statistic_dispatch() {
        let batch = [rec(30, 10), rec(90, 10), rec(10, 10)];
        assert_eq!(Statistic::Max.select(&mut batch.clone()), 1);
        assert_eq!(Statistic::Min.select(&mut batch.clone()), 2);

        let mut sorted = batch;
        let idx = Statistic::Median.select(&mut sorted);
        assert_eq!(sorted[idx].instructions, 30);
    }

    #[test]
    fn test_statistic_parse() {
        for stat in Statistic::ALL {
            assert_eq!(stat.name().parse::<Statistic>(), Ok(stat));
        }
        assert_eq!(" MAX ".parse::<Statistic>(), Ok(Statistic::Max));
        assert_eq!("minimum".parse::<Statistic>(), Ok(Statistic::Min));

        let err = "mean".parse::<Statistic>().unwrap_err();
        assert_eq!(err, UnknownStatistic("mean".to_string()));
        assert!(err.to_string().contains("mean"));
    }

    #[test]
    fn test_statistic_serde_names() {
        let json = serde_json::to_string(&Statistic::Median).unwrap();
        assert_eq!(json, "\"median\"");
        let back: Statistic = serde_json::from_str("\"max\"").unwrap();
        assert_eq!(back, Statistic::Max);
    }

    #[test]
    fn test_median_does_not_use_secondary_key() {
        // Equal throughput, different counters: stable sort keeps input order
        let mut batch = [
            SampleRecord::from_parts(0, 10, 100, 1, 0),
            SampleRecord::from_parts(0, 20, 200, 2, 0),
            SampleRecord::from_parts(0, 30, 300, 3, 0),
        ];
        let idx = select_median(&mut batch);
        let bytes: Vec<u64> = batch.iter().map(|r| r.bytes).collect();
        assert_eq!(bytes, [1, 2, 3]);
        assert_eq!(batch[idx].bytes, 2);
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn to_record((cycles, instructions): (u64, u64)) -> SampleRecord {
        SampleRecord::from_parts(0, cycles, instructions, 0, 0)
    }

    fn batch_strategy() -> impl Strategy<Value = Vec<SampleRecord>> {
        let record = (0u64..1_000, 0u64..100_000).prop_map(to_record);
        prop::collection::vec(record, 1..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Max index dominates every record
        #[test]
        fn prop_max_dominates(batch in batch_strategy()) {
            let idx = select_max(&batch);
            prop_assert!(idx < batch.len());
            for other in &batch {
                prop_assert_ne!(compare_throughput(&batch[idx], other), Ordering::Less);
            }
        }

        /// Min index is dominated by every record
        #[test]
        fn prop_min_dominated(batch in batch_strategy()) {
            let idx = select_min(&batch);
            prop_assert!(idx < batch.len());
            for other in &batch {
                prop_assert_ne!(compare_throughput(&batch[idx], other), Ordering::Greater);
            }
        }

        /// Median returns n / 2 of an ascending batch
        #[test]
        fn prop_median_index(batch in batch_strategy()) {
            let mut sorted = batch.clone();
            let idx = select_median(&mut sorted);
            prop_assert_eq!(idx, batch.len() / 2);
            for pair in sorted.windows(2) {
                prop_assert_ne!(compare_throughput(&pair[0], &pair[1]), Ordering::Greater);
            }
            let below = sorted
                .iter()
                .filter(|r| compare_throughput(r, &sorted[idx]) == Ordering::Less)
                .count();
            prop_assert!(below <= idx);
        }
    }
}
